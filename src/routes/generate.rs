use crate::{clients::GenerateClient, templates::GenerateTemplate};
use actix_web::{HttpResponse, get, post, web};
use askama::Template;
use serde::{Deserialize, Serialize};

#[get("/generate")]
pub(crate) async fn generate_page() -> HttpResponse {
    let html = GenerateTemplate::empty()
        .render()
        .expect("template should be valid");
    HttpResponse::Ok().body(html)
}

/// The post body for requesting cards
#[derive(Serialize, Deserialize, Clone)]
struct PromptForm {
    prompt: String,
}

/// Sends the prompt to the generation endpoint and renders the preview. A
/// failed or malformed upstream response is treated as "no cards produced";
/// nothing is persisted here.
#[post("/generate")]
pub(crate) async fn generate_cards(
    generator: web::Data<GenerateClient>,
    form: web::Form<PromptForm>,
) -> HttpResponse {
    match generator.generate(&form.prompt).await {
        Ok(cards) => {
            let cards_json =
                serde_json::to_string(&cards).expect("flashcards should serialize");
            let html = GenerateTemplate {
                title: "Generate Flashcards",
                prompt: &form.prompt,
                cards,
                cards_json,
                error: None,
            }
            .render()
            .expect("template should be valid");
            HttpResponse::Ok().body(html)
        }
        Err(err) => {
            log::error!("Error generating flashcards: {err}");
            let html = GenerateTemplate {
                title: "Generate Flashcards",
                prompt: &form.prompt,
                cards: Vec::new(),
                cards_json: String::new(),
                error: Some("The generator produced no cards, please try again."),
            }
            .render()
            .expect("template should be valid");
            HttpResponse::Ok().body(html)
        }
    }
}

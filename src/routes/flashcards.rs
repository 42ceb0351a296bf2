use crate::{
    db::{self, AuthContext, CollectionEntry, Flashcard, IndexLookup, SaveError},
    routes::current_user,
    templates::{self, CollectionTemplate, ErrorTemplate, FlashcardsTemplate, GenerateTemplate},
};
use actix_session::Session;
use actix_web::{
    HttpRequest, HttpResponse, Responder, get, post,
    web::{self, Redirect},
};
use askama::Template;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPool;

/// The post body for saving a previewed collection
#[derive(Serialize, Deserialize, Clone)]
struct SaveForm {
    collection_name: String,
    /// The previewed cards, serialized by the generate page.
    cards: String,
    /// The prompt that produced them, so a rejected save loses nothing.
    prompt: String,
}

/// Saves the previewed cards as a new named collection. On success the
/// browser lands on the collection list; on a rejected save the preview is
/// re-rendered with the reason so nothing the user typed is lost.
#[post("/flashcards/save")]
pub(crate) async fn save_collection(
    request: HttpRequest,
    session: Session,
    db_pool: web::ThinData<PgPool>,
    form: web::Form<SaveForm>,
) -> HttpResponse {
    let auth = AuthContext {
        user_id: current_user(&session),
    };
    let cards: Vec<Flashcard> = match serde_json::from_str(&form.cards) {
        Ok(cards) => cards,
        Err(err) => {
            log::error!("Malformed card payload in save form: {err}");
            let error_html = ErrorTemplate {
                title: "Error",
                error: "The save request was malformed, please regenerate your cards.",
            }
            .render()
            .expect("template should be valid");
            return HttpResponse::BadRequest().body(error_html);
        }
    };

    match db::save_collection(&auth, &form.collection_name, &cards, &db_pool).await {
        Ok(()) => Redirect::to("/flashcards")
            .see_other()
            .respond_to(&request)
            .map_into_boxed_body(),
        Err(SaveError::Storage(err)) => {
            log::error!("Error saving collection: {err}");
            let error_html = ErrorTemplate::db_query()
                .render()
                .expect("template should be valid");
            HttpResponse::InternalServerError().body(error_html)
        }
        Err(err) => {
            let reason = err.to_string();
            let html = GenerateTemplate {
                title: "Generate Flashcards",
                prompt: &form.prompt,
                cards,
                cards_json: form.cards.clone(),
                error: Some(&reason),
            }
            .render()
            .expect("template should be valid");
            let mut response = match err {
                SaveError::NotAuthenticated => HttpResponse::Unauthorized(),
                SaveError::InvalidName => HttpResponse::BadRequest(),
                _ => HttpResponse::Conflict(),
            };
            response.body(html)
        }
    }
}

/// Lists every collection the signed-in user has saved. A brand-new user
/// has an empty index and sees an empty list.
#[get("/flashcards")]
pub(crate) async fn collections(
    session: Session,
    db_pool: web::ThinData<PgPool>,
) -> HttpResponse {
    if let Some(user_id) = current_user(&session) {
        match CollectionEntry::user_collections(&user_id, &db_pool).await {
            Ok(collections) => {
                let html = FlashcardsTemplate {
                    title: "My Flashcards",
                    collections,
                }
                .render()
                .expect("template should be valid");
                HttpResponse::Ok().body(html)
            }
            Err(err) => {
                log::error!("Error loading collections: {err}");
                let error_html = ErrorTemplate::db_query()
                    .render()
                    .expect("template should be valid");
                HttpResponse::InternalServerError().body(error_html)
            }
        }
    } else {
        let error_html = templates::ErrorTemplate::not_signed_in()
            .render()
            .expect("template should be valid");
        HttpResponse::Unauthorized().body(error_html)
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct CollectionQuery {
    id: String,
}

/// Shows one saved collection's cards, in the order they were saved. The
/// name travels as a query parameter so names holding `/`, `?` or `#`
/// stay reachable.
#[get("/flashcard")]
pub(crate) async fn collection(
    session: Session,
    db_pool: web::ThinData<PgPool>,
    query: web::Query<CollectionQuery>,
) -> HttpResponse {
    let Some(user_id) = current_user(&session) else {
        let error_html = ErrorTemplate::not_signed_in()
            .render()
            .expect("template should be valid");
        return HttpResponse::Unauthorized().body(error_html);
    };
    let CollectionQuery { id: name } = query.into_inner();
    match CollectionEntry::lookup(&user_id, &name, &*db_pool).await {
        Ok(IndexLookup::Found(entry)) => {
            match db::collection_cards(&user_id, &entry.name, &db_pool).await {
                Ok(cards) => {
                    let html = CollectionTemplate {
                        title: &entry.name,
                        name: &entry.name,
                        cards,
                    }
                    .render()
                    .expect("template should be valid");
                    HttpResponse::Ok().body(html)
                }
                Err(err) => {
                    log::error!("Error loading cards: {err}");
                    let error_html = ErrorTemplate::db_query()
                        .render()
                        .expect("template should be valid");
                    HttpResponse::InternalServerError().body(error_html)
                }
            }
        }
        Ok(IndexLookup::NotFound) => {
            let error_html = ErrorTemplate::collection_not_found()
                .render()
                .expect("template should be valid");
            HttpResponse::NotFound().body(error_html)
        }
        Err(err) => {
            log::error!("Error querying db: {err}");
            let error_html = ErrorTemplate::db_query()
                .render()
                .expect("template should be valid");
            HttpResponse::InternalServerError().body(error_html)
        }
    }
}

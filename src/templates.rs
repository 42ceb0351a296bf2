///The askama template types for HTML
///
use crate::db;
use askama::Template;

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate<'a> {
    pub title: &'a str,
    pub signed_in: bool,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate<'a> {
    pub title: &'a str,
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub error: &'a str,
}

impl<'a> ErrorTemplate<'a> {
    pub fn not_signed_in() -> Self {
        Self {
            title: "Error",
            error: "You must be signed in to view your flashcards.",
        }
    }
    pub fn db_query() -> Self {
        Self {
            title: "Error",
            error: "Error querying the database, please check the logs.",
        }
    }
    pub fn collection_not_found() -> Self {
        Self {
            title: "Error",
            error: "No flashcard collection with that name exists.",
        }
    }
}

#[derive(Template)]
#[template(path = "generate.html")]
pub struct GenerateTemplate<'a> {
    pub title: &'a str,
    pub prompt: &'a str,
    pub cards: Vec<db::Flashcard>,
    /// The preview serialized for the save form's hidden field, so the save
    /// POST carries exactly what the user previewed.
    pub cards_json: String,
    pub error: Option<&'a str>,
}

impl<'a> GenerateTemplate<'a> {
    pub fn empty() -> Self {
        Self {
            title: "Generate Flashcards",
            prompt: "",
            cards: Vec::new(),
            cards_json: String::new(),
            error: None,
        }
    }
}

#[derive(Template)]
#[template(path = "flashcards.html")]
pub struct FlashcardsTemplate<'a> {
    pub title: &'a str,
    pub collections: Vec<db::CollectionEntry>,
}

#[derive(Template)]
#[template(path = "collection.html")]
pub struct CollectionTemplate<'a> {
    pub title: &'a str,
    pub name: &'a str,
    pub cards: Vec<db::Flashcard>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn collection_links_survive_url_special_names() {
        let html = FlashcardsTemplate {
            title: "My Flashcards",
            collections: vec![db::CollectionEntry {
                name: "AC/DC basics?".to_string(),
                position: 0,
                created_at: Utc::now(),
            }],
        }
        .render()
        .expect("template should be valid");
        // `/` is legal inside a query value; space and `?` must be encoded.
        assert!(
            html.contains("href=\"/flashcard?id=AC/DC%20basics%3F\""),
            "{html}"
        );
    }

    #[test]
    fn save_form_carries_the_prompt_and_preview() {
        let html = GenerateTemplate {
            title: "Generate Flashcards",
            prompt: "photosynthesis in depth",
            cards: vec![db::Flashcard {
                front: "Q1".into(),
                back: "A1".into(),
            }],
            cards_json: r#"[{"front":"Q1","back":"A1"}]"#.to_string(),
            error: Some("A flashcard collection with the same name already exists."),
        }
        .render()
        .expect("template should be valid");
        assert!(html.contains("name=\"prompt\" value=\"photosynthesis in depth\""));
        assert!(html.contains("name=\"cards\""));
        assert!(html.contains("already exists"));
    }
}

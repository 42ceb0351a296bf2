pub(crate) mod checkout;
pub(crate) mod flashcards;
pub(crate) mod generate;
pub(crate) mod session;

use crate::templates::HomeTemplate;
use actix_session::Session;
use actix_web::{Responder, Result, get, web};
use askama::Template;

/// Registers every route on the app; handlers themselves stay private to
/// this module tree.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(session::login)
        .service(session::login_post)
        .service(session::logout)
        .service(generate::generate_page)
        .service(generate::generate_cards)
        .service(flashcards::save_collection)
        .service(flashcards::collections)
        .service(flashcards::collection)
        .service(checkout::premium_checkout);
}

/// The user id the identity provider vouched for, if this session has one.
pub(crate) fn current_user(session: &Session) -> Option<String> {
    session.get::<String>("user_id").unwrap_or(None)
}

/// The marketing landing page. Signed-out visitors get sign-in links, signed
/// in ones get straight to generating.
#[get("/")]
pub(crate) async fn home(session: Session) -> Result<impl Responder> {
    let html = HomeTemplate {
        title: "PromptWise",
        signed_in: current_user(&session).is_some(),
    }
    .render()
    .expect("template should be valid");

    Ok(web::Html::new(html))
}

use crate::{clients::CheckoutClient, templates::ErrorTemplate};
use actix_web::{
    HttpRequest, HttpResponse, Responder, post,
    web::{self, Redirect},
};
use askama::Template;

/// Starts the premium paywall flow: asks the provider for a hosted checkout
/// session and sends the browser there. Payment happens entirely on the
/// provider's page; failures are logged and shown, never retried.
#[post("/checkout")]
pub(crate) async fn premium_checkout(
    request: HttpRequest,
    checkout: web::Data<CheckoutClient>,
) -> HttpResponse {
    match checkout.create_session().await {
        Ok(checkout_session) => {
            log::info!("created checkout session {}", checkout_session.id);
            Redirect::to(checkout_session.url)
                .see_other()
                .respond_to(&request)
                .map_into_boxed_body()
        }
        Err(err) => {
            log::error!("Failed to redirect to checkout: {err}");
            let error_html = ErrorTemplate {
                title: "Error",
                error: "Checkout is unavailable right now, please try again later.",
            }
            .render()
            .expect("template should be valid");
            HttpResponse::InternalServerError().body(error_html)
        }
    }
}

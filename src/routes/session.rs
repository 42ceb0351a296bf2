use crate::{clients::IdentityClient, templates::LoginTemplate};
use actix_session::Session;
use actix_web::{
    HttpRequest, HttpResponse, Responder, Result, get, post,
    web::{self, Redirect},
};
use askama::Template;
use serde::{Deserialize, Serialize};

/// Takes you to the login page
#[get("/login")]
pub(crate) async fn login() -> Result<impl Responder> {
    let html = LoginTemplate {
        title: "Log in",
        error: None,
    };
    Ok(web::Html::new(
        html.render().expect("template should be valid"),
    ))
}

/// The post body for logging in: a session token issued by the identity
/// provider's own sign-in flow.
#[derive(Serialize, Deserialize, Clone)]
struct LoginForm {
    token: String,
}

/// Login endpoint. Verifies the token with the identity provider and pins
/// the vouched-for user id to the cookie session.
#[post("/login")]
pub(crate) async fn login_post(
    request: HttpRequest,
    form: web::Form<LoginForm>,
    identity: web::Data<IdentityClient>,
    session: Session,
) -> HttpResponse {
    match identity.verify(&form.token).await {
        Ok(user) if user.is_authenticated => {
            session.insert("user_id", user.user_id).unwrap();
            Redirect::to("/")
                .see_other()
                .respond_to(&request)
                .map_into_boxed_body()
        }
        Ok(_) => {
            let html = LoginTemplate {
                title: "Log in",
                error: Some("The identity provider rejected that token."),
            };
            HttpResponse::Unauthorized().body(html.render().expect("template should be valid"))
        }
        Err(err) => {
            log::error!("Error verifying token: {err}");
            let html = LoginTemplate {
                title: "Log in",
                error: Some("Identity provider error, check the logs"),
            };
            HttpResponse::Ok().body(html.render().expect("template should be valid"))
        }
    }
}

/// Logs you out by destroying your cookie on the server and web browser
#[get("/logout")]
pub(crate) async fn logout(request: HttpRequest, session: Session) -> HttpResponse {
    session.purge();
    Redirect::to("/")
        .see_other()
        .respond_to(&request)
        .map_into_boxed_body()
}

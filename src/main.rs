use actix_files::Files;
use actix_session::{SessionMiddleware, config::PersistentSession, storage::CookieSessionStore};
use actix_web::{
    App, HttpServer,
    cookie::{self, Key},
    middleware, web,
};
use dotenv::dotenv;
use promptwise_be::{
    clients::{CheckoutClient, GenerateClient, IdentityClient},
    config::Config,
    db::create_tables_in_database,
    routes,
};
use sqlx::postgres::PgPool;
use std::io::{Error, ErrorKind};

extern crate dotenv;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let config = Config::from_env();
    let host = config.host.clone();
    let port = config.port;

    //Creates a db pool to share resources to the db
    let pool = match PgPool::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            log::error!("Error creating the db pool: {}", err);
            return Err(Error::new(ErrorKind::Other, "db pool could not be created."));
        }
    };

    //Creates the DB and tables
    create_tables_in_database(&pool)
        .await
        .expect("Could not create the database");

    // One shared HTTP connection pool for all three collaborators
    let http = reqwest::Client::new();
    let identity = IdentityClient::new(http.clone(), config.identity_url.clone());
    let generator = GenerateClient::new(http.clone(), config.generate_url.clone());
    let checkout = CheckoutClient::new(
        http,
        config.checkout_url.clone(),
        config.checkout_secret.clone(),
    );

    // Without SESSION_SECRET every restart invalidates all cookies
    let session_key = match config.session_secret.as_deref() {
        Some(secret) => Key::derive_from(secret.as_bytes()),
        None => {
            log::warn!("SESSION_SECRET not set, sessions will not survive a restart");
            Key::generate()
        }
    };

    log::info!("starting HTTP server at http://{host}:{port}");
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::ThinData(pool.clone()))
            .app_data(web::Data::new(identity.clone()))
            .app_data(web::Data::new(generator.clone()))
            .app_data(web::Data::new(checkout.clone()))
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    //TODO will need to set to true in production
                    .cookie_secure(false)
                    // customize session and cookie expiration
                    .session_lifecycle(
                        PersistentSession::default().session_ttl(cookie::time::Duration::days(14)),
                    )
                    .build(),
            )
            .service(Files::new("/css", "public/css").show_files_listing())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

#[macro_use]
extern crate rocket;

mod config;
mod models;
mod routes;
mod services;
mod utils;

use dotenvy::dotenv;
use log::info;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::fs::{FileServer, relative};
use rocket::http::Header;
use rocket::{Build, Request, Response, Rocket};
use rocket_dyn_templates::Template;
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};

use crate::config::Config;
use crate::services::{ContentService, SharedSubmitter};

/* ----------------------------- CORS ----------------------------- */

pub struct CORS;

#[rocket::async_trait]
impl Fairing for CORS {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        if let Some(origin) = request.headers().get_one("Origin") {
            response.set_header(Header::new("Access-Control-Allow-Origin", origin.to_string()));
        }

        response.set_header(Header::new("Access-Control-Allow-Methods", "GET, POST, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "Content-Type"));
    }
}

/* ----------------------------- OPTIONS ----------------------------- */

#[options("/<_..>")]
fn options_handler() {}

/* ----------------------------- ERRORS ----------------------------- */

#[catch(400)]
fn bad_request() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Malformed request body"
    })
}

#[catch(404)]
fn not_found() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Resource not found"
    })
}

#[catch(422)]
fn unprocessable() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Request body does not match the expected form"
    })
}

#[catch(500)]
fn internal_error() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Internal server error"
    })
}

/* ----------------------------- SWAGGER ----------------------------- */

fn swagger_config() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/api/v1/openapi.json".to_string(),
        ..Default::default()
    }
}

/* ----------------------------- LAUNCH ----------------------------- */

fn build(submitter: SharedSubmitter, content: ContentService) -> Rocket<Build> {
    rocket::build()
        .manage(submitter)
        .manage(content)
        .attach(CORS)
        .attach(Template::fairing())
        .mount("/", routes![options_handler])
        .mount(
            "/",
            routes![
                // Website
                routes::pages::home,
                routes::pages::dakhala_page,
                routes::pages::submit_dakhala,
                // Legacy front-end endpoints
                routes::content::get_development_works,
                routes::content::get_tax_qr_codes,
            ],
        )
        .mount(
            "/api/v1",
            openapi_get_routes![
                // Content
                routes::content::get_development_works,
                routes::content::get_tax_qr_codes,
                routes::content::get_village,
                routes::content::get_officials,
                routes::content::get_members,
                routes::content::get_slogans,
                // Certificates
                routes::certificate::list_certificate_types,
                routes::certificate::validate_certificate_request,
                routes::certificate::submit_certificate_request,
                routes::certificate::submit_certificate_request_base64,
            ],
        )
        .mount("/static", FileServer::from(relative!("static")))
        .mount("/api/docs", make_swagger_ui(&swagger_config()))
        .register(
            "/",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
}

#[launch]
fn rocket() -> Rocket<Build> {
    dotenv().ok();
    env_logger::init();

    info!("Gram Panchayat {} site starting", Config::village_name());
    if Config::is_simulated_backend() {
        info!("Certificate requests go to the simulated office backend");
    }
    info!("Swagger UI → http://localhost:8000/api/docs");

    build(services::submission::from_config(), ContentService::from_config())
}

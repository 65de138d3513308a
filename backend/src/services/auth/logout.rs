use super::session::expired_cookie;
use actix_web::HttpResponse;

pub(crate) async fn process() -> HttpResponse {
    HttpResponse::Ok().cookie(expired_cookie()).finish()
}

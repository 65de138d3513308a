use super::session::Session;
use actix_web::HttpResponse;

pub(crate) async fn process(session: Session) -> HttpResponse {
    HttpResponse::Ok().json(session.user)
}

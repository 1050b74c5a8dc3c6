//! Admin dashboard endpoints. Every handler takes an [`AdminSession`].

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;

use folio_core::domain::{EntryDraft, PostDraft};
use folio_core::ports::UploadError;
use folio_shared::ApiResponse;
use folio_shared::dto::{EntryRequest, MarkdownRequest, PostRequest, UploadResponse};

use super::{entry_response, post_response};
use crate::middleware::auth::AdminSession;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Form field carrying the uploaded file.
const UPLOAD_FIELD: &str = "file";

fn post_draft(req: PostRequest) -> PostDraft {
    PostDraft::new(req.title, req.body, req.synopsis, req.cover_image)
}

fn entry_draft(req: EntryRequest) -> EntryDraft {
    EntryDraft::new(req.title, req.repo, req.url, req.cover_image)
}

/// POST /api/admin/markdown - preview a post body.
pub async fn markdown_preview(
    _admin: AdminSession,
    state: web::Data<AppState>,
    body: web::Json<MarkdownRequest>,
) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(state.markdown.render(&body.markdown))
}

/// POST /api/admin/posts
pub async fn create_post(
    admin: AdminSession,
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.content.create_post(post_draft(body.into_inner())).await?;

    tracing::info!(post_id = %post.id, user_id = %admin.user_id, "Post created");
    Ok(HttpResponse::Created().json(post_response(&post)))
}

/// PUT /api/admin/posts/{id}
pub async fn update_post(
    admin: AdminSession,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .content
        .update_post(&path, post_draft(body.into_inner()))
        .await?;

    tracing::info!(post_id = %post.id, user_id = %admin.user_id, "Post updated");
    Ok(HttpResponse::Ok().json(post_response(&post)))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete_post(
    admin: AdminSession,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.content.delete_post(&id).await?;

    tracing::info!(post_id = %id, user_id = %admin.user_id, "Post deleted");
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(id, "Post deleted")))
}

/// POST /api/admin/portfolio
pub async fn create_entry(
    admin: AdminSession,
    state: web::Data<AppState>,
    body: web::Json<EntryRequest>,
) -> AppResult<HttpResponse> {
    let entry = state
        .content
        .create_portfolio_entry(entry_draft(body.into_inner()))
        .await?;

    tracing::info!(entry_id = %entry.id, user_id = %admin.user_id, "Portfolio entry created");
    Ok(HttpResponse::Created().json(entry_response(&entry)))
}

/// PUT /api/admin/portfolio/{id}
pub async fn update_entry(
    _admin: AdminSession,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<EntryRequest>,
) -> AppResult<HttpResponse> {
    let entry = state
        .content
        .update_entry(&path, entry_draft(body.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(entry_response(&entry)))
}

/// DELETE /api/admin/portfolio/{id}
pub async fn delete_entry(
    admin: AdminSession,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.content.delete_entry(&id).await?;

    tracing::info!(entry_id = %id, user_id = %admin.user_id, "Portfolio entry deleted");
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(id, "Portfolio entry deleted")))
}

fn malformed_form(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("malformed upload form: {err}"))
}

/// Read one field into memory, refusing anything over `limit` bytes.
async fn read_field(field: &mut Field, limit: usize) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed_form)? {
        if bytes.len() + chunk.len() > limit {
            return Err(UploadError::Rejected(format!("file exceeds {limit} bytes")).into());
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// POST /api/admin/uploads
///
/// `multipart/form-data` with the image in the `file` field. Responds with the
/// stored filename to use as a cover image.
pub async fn upload(
    _admin: AdminSession,
    state: web::Data<AppState>,
    mut form: Multipart,
) -> AppResult<HttpResponse> {
    while let Some(mut field) = form.try_next().await.map_err(malformed_form)? {
        if field.name() != Some(UPLOAD_FIELD) {
            while field.try_next().await.map_err(malformed_form)?.is_some() {}
            continue;
        }

        let original_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        let bytes = read_field(&mut field, state.upload_max_bytes).await?;
        let filename = state.uploads.save(&original_name, &bytes).await?;

        return Ok(HttpResponse::Created().json(UploadResponse { filename }));
    }

    Err(AppError::BadRequest(format!(
        "missing `{UPLOAD_FIELD}` field in upload form"
    )))
}

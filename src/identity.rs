use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use anyhow::anyhow;

use crate::error::AppError;
use crate::AppState;

/// The authenticated caller, threaded through every handler as a request
/// extension. Until a real auth layer exists, this resolves the single
/// profile row seeded by the migrations.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
}

pub async fn resolve_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = sqlx::query_scalar::<_, i64>("SELECT id FROM users ORDER BY id ASC LIMIT 1")
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow!("no profile user provisioned")))?;

    req.extensions_mut().insert(CurrentUser { id: user_id });
    Ok(next.run(req).await)
}

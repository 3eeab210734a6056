use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use crate::{
    ENV,
    api::error,
    utils::{Claims, TypeClaims},
};

/// Requires a `Bearer` access token and stores its claims in the request
/// extensions for `get_claims`.
pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let auth = req.headers().get("Authorization").and_then(|h| h.to_str().ok());
    let Some(token) = auth.and_then(|h| h.strip_prefix("Bearer ")) else {
        return Err(error::Error::unauthorized("Token Invalid or Expired").into());
    };

    let claims = Claims::decode(token, ENV.jwt_secret.as_ref())
        .ok()
        .filter(|c| c.is(TypeClaims::AccessToken))
        .ok_or_else(|| error::Error::forbidden("Token Invalid or Expired"))?;

    req.extensions_mut().insert(claims);

    next.call(req).await
}

pub fn get_claims(req: &HttpRequest) -> Result<Claims, error::Error> {
    let extensions = req.extensions();

    let claims = extensions
        .get::<Claims>()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized"))?
        .clone();

    Ok(claims)
}

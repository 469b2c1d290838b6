use std::collections::HashSet;

use isora_common::CoreError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::context::TenantContext;

#[derive(Debug, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub org_role: Option<String>,
    #[serde(default)]
    pub is_super_admin: bool,
    #[serde(default)]
    pub available_tenants: Vec<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    pub exp: usize,
}

/// Decode a bearer token **without** validating signature or expiry. Ground
/// truth: `tenant_middleware.py`'s `_extract_tenant_context` does exactly
/// this and defers full validation to the protected-handler layer (§4.9
/// step 3). Only used to bind a best-effort `TenantContext` early in the
/// pipeline; never trust its output for an authorization decision.
pub fn decode_unchecked(token: &str, secret: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .ok()
        .map(|data| data.claims)
}

/// Full validation for protected handlers (§4.9 step 4): signature, expiry,
/// and `type == "access"` (refresh tokens must not authenticate API calls).
pub fn decode_validated(token: &str, secret: &str) -> Result<Claims, CoreError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => CoreError::TokenExpired,
            _ => CoreError::InvalidToken,
        })?;

    match data.claims.token_type.as_deref() {
        Some("access") | None => Ok(data.claims),
        Some(_) => Err(CoreError::InvalidToken),
    }
}

/// Build a `TenantContext` from unchecked claims, applying the super-admin
/// `X-Tenant-ID` override (§3.1, §4.7). Returns `None` if the claims lack
/// both `tenant_id` and `sub` — absence here is not an error, it just means
/// no context is bound.
pub fn context_from_claims(
    claims: &Claims,
    header_tenant_override: Option<&str>,
) -> Option<TenantContext> {
    let mut tenant_id = claims.tenant_id.clone()?;
    if tenant_id.is_empty() {
        return None;
    }
    if claims.sub.is_empty() {
        return None;
    }

    if claims.is_super_admin {
        if let Some(header_tenant) = header_tenant_override {
            if !header_tenant.is_empty() {
                tenant_id = header_tenant.to_string();
            }
        }
    }

    Some(TenantContext {
        tenant_id,
        user_id: claims.sub.clone(),
        org_role: claims.org_role.clone().unwrap_or_else(|| "member".to_string()),
        is_super_admin: claims.is_super_admin,
        available_tenants: claims.available_tenants.iter().cloned().collect::<HashSet<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token_with(claims: serde_json::Value, secret: &str) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn decode_unchecked_ignores_expiry() {
        let exp = (Utc::now().timestamp() - 10_000) as usize;
        let tok = token_with(
            json!({"sub": "u1", "tenant_id": "t1", "exp": exp}),
            "secret",
        );
        let claims = decode_unchecked(&tok, "secret").expect("decodes despite expiry");
        assert_eq!(claims.tenant_id.as_deref(), Some("t1"));
    }

    #[test]
    fn decode_validated_rejects_expired() {
        let exp = (Utc::now().timestamp() - 10_000) as usize;
        let tok = token_with(json!({"sub": "u1", "exp": exp}), "secret");
        assert!(matches!(
            decode_validated(&tok, "secret"),
            Err(CoreError::TokenExpired)
        ));
    }

    #[test]
    fn decode_validated_rejects_refresh_token_type() {
        let exp = (Utc::now().timestamp() + 10_000) as usize;
        let tok = token_with(
            json!({"sub": "u1", "exp": exp, "type": "refresh"}),
            "secret",
        );
        assert!(matches!(
            decode_validated(&tok, "secret"),
            Err(CoreError::InvalidToken)
        ));
    }

    #[test]
    fn super_admin_header_override_applies() {
        let claims = Claims {
            sub: "u1".into(),
            tenant_id: Some("t1".into()),
            org_role: Some("owner".into()),
            is_super_admin: true,
            available_tenants: vec![],
            plan: None,
            token_type: None,
            exp: 0,
        };
        let ctx = context_from_claims(&claims, Some("t2")).unwrap();
        assert_eq!(ctx.tenant_id, "t2");
    }

    #[test]
    fn non_super_admin_override_ignored_here_enforced_in_context() {
        let claims = Claims {
            sub: "u1".into(),
            tenant_id: Some("t1".into()),
            org_role: Some("member".into()),
            is_super_admin: false,
            available_tenants: vec![],
            plan: None,
            token_type: None,
            exp: 0,
        };
        let ctx = context_from_claims(&claims, Some("t2")).unwrap();
        assert_eq!(ctx.tenant_id, "t1");
    }

    #[test]
    fn missing_tenant_id_yields_no_context() {
        let claims = Claims {
            sub: "u1".into(),
            tenant_id: None,
            org_role: None,
            is_super_admin: false,
            available_tenants: vec![],
            plan: None,
            token_type: None,
            exp: 0,
        };
        assert!(context_from_claims(&claims, None).is_none());
    }
}

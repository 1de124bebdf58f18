mod authorizer;
mod cognito;

pub use authorizer::{AuthError, Authorizer, Claims, PermissiveAuthorizer};
pub use cognito::CognitoAuthorizer;

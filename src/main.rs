use serde::Serialize;
use serde_json::json;
use sqlx::{migrate::Migrator, SqlitePool as Pool};
use tide::{Body, Request, Response};

use storefront::auth::{AuthError, AuthService, LoginPayload, RegisterPayload};
use storefront::catalog::{CatalogError, CatalogService, ProductDraft};
use storefront::{AuthSqlService, CatalogSqlService, Id};

static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Clone)]
struct AppState {
    catalog: CatalogSqlService,
    auth: AuthSqlService,
}

fn error_response(status: u16, code: &str, message: &str) -> Response {
    let mut res = Response::new(status);
    res.set_body(json!({
        "success": false,
        "error": code,
        "error_message": message,
    }));
    res
}

fn token_error_response(code: &str, message: &str) -> Response {
    let mut res = Response::new(401);
    res.set_body(json!({
        "success": false,
        "code": code,
        "error_message": message,
    }));
    res
}

fn catalog_reply<T: Serialize>(ok_status: u16, result: &Result<T, CatalogError>) -> tide::Result {
    match result {
        Ok(value) => {
            let mut res = Response::new(ok_status);
            res.set_body(Body::from_json(value)?);
            Ok(res)
        }
        Err(err) => Ok(match err {
            CatalogError::NotFound(..) => error_response(404, "E_NOT_FOUND", &err.to_string()),
            CatalogError::InvalidSize { .. } | CatalogError::InvalidInput(_) => {
                error_response(400, "E_BAD_REQUEST", &err.to_string())
            }
            CatalogError::Storage => error_response(
                500,
                "E_DATABASE",
                "Please contact the administrator, storage is down",
            ),
            CatalogError::Mapping => error_response(
                500,
                "E_MAPPING",
                "Stored data is corrupted, please contact the administrator",
            ),
        }),
    }
}

fn auth_reply<T: Serialize>(ok_status: u16, result: &Result<T, AuthError>) -> tide::Result {
    match result {
        Ok(value) => {
            let mut res = Response::new(ok_status);
            res.set_body(Body::from_json(value)?);
            Ok(res)
        }
        Err(err) => Ok(match err {
            AuthError::Conflict(_) => error_response(409, "E_CONFLICT", &err.to_string()),
            AuthError::InvalidInput(_) => error_response(400, "E_BAD_REQUEST", &err.to_string()),
            AuthError::InvalidCredentials => {
                error_response(400, "E_INVALID_CREDENTIALS", "Invalid credentials")
            }
            AuthError::TokenExpired => token_error_response("TOKEN_EXPIRED", "Session expired"),
            AuthError::TokenInvalid => token_error_response("TOKEN_INVALID", "Token is not valid"),
            AuthError::Storage => error_response(
                500,
                "E_DATABASE",
                "Please contact the administrator, storage is down",
            ),
        }),
    }
}

fn bearer_token<State>(request: &Request<State>) -> Option<String> {
    request
        .header("Authorization")?
        .get(0)?
        .as_str()
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

async fn register(mut request: Request<AppState>) -> tide::Result {
    let payload: RegisterPayload = request.body_json().await?;
    let result = request.state().auth.register(&payload).await;
    if let Ok(session) = &result {
        tide::log::info!("registered user {}", session.user.username);
    }
    auth_reply(201, &result)
}

async fn login(mut request: Request<AppState>) -> tide::Result {
    let payload: LoginPayload = request.body_json().await?;
    let result = request.state().auth.login(&payload).await;
    auth_reply(200, &result)
}

async fn me(request: Request<AppState>) -> tide::Result {
    let result = match bearer_token(&request) {
        Some(token) => request.state().auth.verify(&token).await,
        None => Err(AuthError::TokenInvalid),
    };
    auth_reply(200, &result)
}

async fn list_products(request: Request<AppState>) -> tide::Result {
    let result = request.state().catalog.list().await;
    catalog_reply(200, &result)
}

async fn read_product(request: Request<AppState>) -> tide::Result {
    let key = request.param("key")?;
    let catalog = &request.state().catalog;
    let result = match key.parse::<Id>() {
        Ok(id) => catalog.read(id).await,
        // `classic-tee-Red`: the variant color sits after the last hyphen
        Err(_) => match key.rsplit_once('-') {
            Some((slug, color)) => catalog.read_variant(slug, color).await,
            None => Err(CatalogError::NotFound("product", key.to_string())),
        },
    };
    catalog_reply(200, &result)
}

async fn create_product(mut request: Request<AppState>) -> tide::Result {
    let draft: ProductDraft = request.body_json().await?;
    let result = request.state().catalog.create(&draft).await;
    if let Ok(product) = &result {
        tide::log::info!("created product {} ({})", product.id, product.name);
    }
    catalog_reply(201, &result)
}

async fn update_product(mut request: Request<AppState>) -> tide::Result {
    let draft: ProductDraft = request.body_json().await?;
    let raw = request.param("id")?.to_string();
    let result = match raw.parse::<Id>() {
        Ok(id) => request.state().catalog.update(id, &draft).await,
        Err(_) => Err(CatalogError::NotFound("product", raw)),
    };
    catalog_reply(200, &result)
}

async fn delete_product(request: Request<AppState>) -> tide::Result {
    let raw = request.param("id")?.to_string();
    let result = match raw.parse::<Id>() {
        Ok(id) => request.state().catalog.delete(id).await,
        Err(_) => Err(CatalogError::NotFound("product", raw)),
    };
    if result.is_ok() {
        let mut res = Response::new(200);
        res.set_body(json!({ "message": "product deleted" }));
        return Ok(res);
    }
    catalog_reply(200, &result)
}

async fn dependencies(request: Request<AppState>) -> tide::Result {
    let result = request.state().catalog.dependencies().await;
    catalog_reply(200, &result)
}

const DEFAULT_DB_FILE: &str = "sqlite:storefront.db?mode=rwc";
const DEFAULT_PORT: &str = "4000";
const DEV_SECRET: &str = "storefront-dev-secret";

#[async_std::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tide::log::start();

    let db_file = std::env::args()
        .nth(1)
        .map(|f| format!("sqlite:{}?mode=rwc", f))
        .unwrap_or_else(|| DEFAULT_DB_FILE.into());
    let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.into());
    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tide::log::warn!("JWT_SECRET not set, using the development secret");
        DEV_SECRET.into()
    });

    let pool = Pool::connect(&db_file).await?;
    MIGRATOR.run(&pool).await?;

    let state = AppState {
        catalog: CatalogSqlService::new(pool.clone()),
        auth: AuthSqlService::new(pool, secret.into_bytes()),
    };
    let mut app = tide::with_state(state);

    app.at("/")
        .get(|_| async move { Ok(json!({ "version": "1" })) });

    app.at("/auth/register").post(register);
    app.at("/auth/login").post(login);
    app.at("/auth/me").get(me);

    app.at("/products").get(list_products).post(create_product);
    app.at("/products/dependencies").get(dependencies);
    app.at("/products/:key").get(read_product);
    app.at("/products/:id").put(update_product).delete(delete_product);

    let addr = format!("0.0.0.0:{}", port);
    tide::log::info!("listening on {}", addr);
    app.listen(addr).await?;
    Ok(())
}

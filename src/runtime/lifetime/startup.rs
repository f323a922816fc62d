use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, warn};

const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@localhost";
const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 依次尝试的缓存后端：配置项优先，内存缓存兜底
fn cache_candidates(configured: &str) -> Vec<&str> {
    let mut candidates = vec![configured];
    if configured != "moka" {
        candidates.push("moka");
    }
    candidates
}

async fn create_cache() -> std::result::Result<Arc<dyn ObjectCache>, String> {
    let configured = AppConfig::get().cache.cache_type.as_str();

    for name in cache_candidates(configured) {
        let Some(constructor) = get_object_cache_plugin(name) else {
            warn!("Cache backend '{}' not found in registry", name);
            continue;
        };
        match constructor().await {
            Ok(cache) => {
                if name != configured {
                    warn!("Falling back to {} cache backend", name);
                }
                warn!("Cache backend '{}' ready", name);
                return Ok(Arc::from(cache));
            }
            Err(e) => warn!("Failed to create {} cache: {}", name, e),
        }
    }

    Err(format!("No cache backend available (configured: {configured})"))
}

fn generate_random_password(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| PASSWORD_CHARSET[rng.random_range(0..PASSWORD_CHARSET.len())] as char)
        .collect()
}

/// 管理员初始密码：`ADMIN_PASSWORD` 优先，否则生成一次并写入日志
fn initial_admin_password() -> String {
    match std::env::var("ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => {
            let password = generate_random_password(16);
            warn!("ADMIN_PASSWORD is not set, generated admin password: {}", password);
            warn!("Store it now, it will not be shown again");
            password
        }
    }
}

/// 用户表为空时创建默认管理员，已有用户时返回 None
async fn seed_admin(storage: &dyn Storage) -> Result<Option<User>> {
    let count = storage.count_users().await?;
    if count > 0 {
        debug!("{} user(s) present, admin seed skipped", count);
        return Ok(None);
    }

    let password_hash = hash_password(&initial_admin_password())?;

    let admin = storage
        .create_user(CreateUserRequest {
            username: ADMIN_USERNAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: password_hash,
            role: UserRole::Admin,
            display_name: Some("Administrator".to_string()),
            branch_id: None,
        })
        .await?;
    info!("Seeded admin account (id {})", admin.id);
    Ok(Some(admin))
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    if let Err(e) = seed_admin(storage.as_ref()).await {
        warn!("Admin seed failed: {}", e);
    }

    let cache = create_cache().await.expect("Failed to create cache");

    StartupContext { storage, cache }
}

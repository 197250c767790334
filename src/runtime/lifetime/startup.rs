use crate::cache::{
    ObjectCache,
    register::{get_object_cache_plugin, registered_object_cache_plugins},
};
use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_random_password;
use crate::utils::validate::validate_password_simple;
use std::sync::Arc;
use tracing::{debug, info, warn};

const FALLBACK_CACHE: &str = "moka";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按顺序尝试的缓存后端：配置值在前，内存缓存兜底
fn cache_candidates(configured: &str) -> Vec<&str> {
    if configured == FALLBACK_CACHE {
        vec![configured]
    } else {
        vec![configured, FALLBACK_CACHE]
    }
}

/// 创建缓存实例
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let cache_type = &AppConfig::get().cache.cache_type;

    for candidate in cache_candidates(cache_type) {
        let Some(constructor) = get_object_cache_plugin(candidate) else {
            warn!("Cache backend '{}' not found in registry", candidate);
            continue;
        };
        match constructor().await {
            Ok(cache) => {
                if candidate != cache_type.as_str() {
                    warn!("Using fallback {} cache instead of {}", candidate, cache_type);
                }
                warn!("Successfully created {} cache backend", candidate);
                return Ok(Arc::from(cache));
            }
            Err(e) => warn!("Failed to create {} cache: {}", candidate, e),
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 管理员初始密码：优先 ADMIN_PASSWORD，否则生成一个并打印一次
fn admin_password() -> String {
    match std::env::var("ADMIN_PASSWORD") {
        Ok(pwd) => {
            if let Err(msg) = validate_password_simple(&pwd) {
                warn!("ADMIN_PASSWORD does not meet the password policy: {}", msg);
            }
            pwd
        }
        Err(_) => {
            let pwd = generate_random_password(16);
            warn!("==========================================================");
            warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
            warn!("  Generated admin password: {}", pwd);
            warn!("  Please save this password or set ADMIN_PASSWORD env var");
            warn!("==========================================================");
            pwd
        }
    }
}

/// 空库时创建 admin 账号，已有用户则跳过
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => info!("No users found in database, creating default admin account..."),
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let password_hash = match hash_password(&admin_password()) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        username: "admin".to_string(),
        email: "admin@localhost".to_string(),
        password: password_hash,
        role: UserRole::Admin,
        display_name: Some("Administrator".to_string()),
        language: None,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => info!(
            "Default admin account created (ID: {}, username: {})",
            user.id, user.username
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和默认管理员
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    debug!(
        "Registered cache backends: {:?}",
        registered_object_cache_plugins()
    );

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_candidates_fall_back_to_memory() {
        assert_eq!(cache_candidates("redis"), vec!["redis", "moka"]);
        assert_eq!(cache_candidates("moka"), vec!["moka"]);
    }

    #[test]
    fn test_fallback_cache_is_registered() {
        assert!(registered_object_cache_plugins().contains(&FALLBACK_CACHE));
        for candidate in cache_candidates("redis") {
            assert!(get_object_cache_plugin(candidate).is_some(), "{candidate}");
        }
    }
}

//! 对象缓存
//!
//! 后端以插件形式在程序加载时注册（见 `declare_object_cache_plugin!`），
//! 启动时按 `cache.cache_type` 选择，目前用于缓存已认证用户。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    // 后端出错，无法判断键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    // ttl 为 0 时使用后端默认值
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 声明缓存插件，在程序加载时注册到全局插件表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            let constructor: $crate::cache::register::ObjectCacheConstructor =
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let result: $crate::errors::Result<Box<dyn $crate::cache::ObjectCache>> =
                            <$ty>::new()
                                .map(|cache| Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                                .map_err($crate::errors::TutorHubError::cache_connection);
                        result
                    }) as $crate::cache::register::BoxedObjectCacheFuture
                });
            $crate::cache::register::register_object_cache_plugin($name, constructor);
        }
    };
}

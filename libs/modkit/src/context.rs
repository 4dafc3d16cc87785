use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    /// Returns raw JSON section for the module, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

#[derive(Clone)]
pub struct ModuleCtx {
    pub(crate) config_provider: Option<Arc<dyn ConfigProvider>>,
    pub(crate) cancellation_token: CancellationToken,
    pub(crate) module_name: Option<Arc<str>>,
}

pub struct ModuleCtxBuilder {
    inner: ModuleCtx,
}

impl ModuleCtxBuilder {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            inner: ModuleCtx {
                config_provider: None,
                cancellation_token: token,
                module_name: None,
            },
        }
    }

    pub fn with_config_provider(mut self, p: Arc<dyn ConfigProvider>) -> Self {
        self.inner.config_provider = Some(p);
        self
    }

    pub fn build(self) -> ModuleCtx {
        self.inner
    }
}

impl ModuleCtx {
    /// Scope context to a specific module name (the registry does this per phase).
    pub fn for_module(mut self, name: &str) -> Self {
        self.module_name = Some(Arc::<str>::from(name));
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    pub fn current_module(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    /// Deserialize the module's config section into `T`.
    ///
    /// A missing section (or an unscoped context) yields `T::default()`;
    /// a present but malformed section is an error naming the module.
    pub fn module_config<T: DeserializeOwned + Default>(&self) -> anyhow::Result<T> {
        let (Some(name), Some(p)) = (&self.module_name, &self.config_provider) else {
            return Ok(T::default());
        };

        match p.get_module_config(name) {
            None => Ok(T::default()),
            Some(val) => serde_json::from_value(val.clone())
                .map_err(|e| anyhow::anyhow!("invalid {name} config: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        #[serde(default)]
        enabled: bool,
        #[serde(default)]
        limit: u32,
    }

    struct MapProvider(HashMap<String, serde_json::Value>);

    impl ConfigProvider for MapProvider {
        fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
            self.0.get(module_name)
        }
    }

    fn ctx_with(name: &str, value: Option<serde_json::Value>) -> ModuleCtx {
        let mut map = HashMap::new();
        if let Some(v) = value {
            map.insert(name.to_string(), v);
        }
        ModuleCtxBuilder::new(CancellationToken::new())
            .with_config_provider(Arc::new(MapProvider(map)))
            .build()
            .for_module(name)
    }

    #[test]
    fn typed_section_is_deserialized() {
        let ctx = ctx_with("sample", Some(serde_json::json!({"enabled": true, "limit": 5})));
        let cfg: Sample = ctx.module_config().unwrap();
        assert_eq!(
            cfg,
            Sample {
                enabled: true,
                limit: 5
            }
        );
        assert_eq!(ctx.current_module(), Some("sample"));
    }

    #[test]
    fn missing_section_falls_back_to_default() {
        let ctx = ctx_with("sample", None);
        let cfg: Sample = ctx.module_config().unwrap();
        assert_eq!(cfg, Sample::default());
    }

    #[test]
    fn unscoped_context_uses_default() {
        let ctx = ModuleCtxBuilder::new(CancellationToken::new()).build();
        let cfg: Sample = ctx.module_config().unwrap();
        assert_eq!(cfg, Sample::default());
        assert!(ctx.current_module().is_none());
    }

    #[test]
    fn malformed_section_is_an_error() {
        let ctx = ctx_with("sample", Some(serde_json::json!({"bogus": 1})));
        let err = ctx.module_config::<Sample>().unwrap_err();
        assert!(err.to_string().contains("invalid sample config"));
    }
}

use crate::core::page::{Bootstrapper, MountPoint, ShellDocument};
use crate::domain::model::{FailurePolicy, SwapOrdering, SwapOutcome, TriggerDescriptor, TriggerEvent};
use crate::domain::ports::FragmentFetcher;
use crate::utils::error::{AppError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const DEFAULT_FAILURE_MESSAGE: &str =
    r#"<div class="alert alert-error"><span>Request failed</span></div>"#;

#[derive(Debug, Clone)]
pub struct BinderOptions {
    pub ordering: SwapOrdering,
    pub on_failure: FailurePolicy,
    pub failure_message: String,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            ordering: SwapOrdering::Completion,
            on_failure: FailurePolicy::Silent,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }
}

struct BinderState {
    mount: MountPoint,
    generations: HashMap<String, u64>,
}

/// 依型別化登記表分派觸發事件，並將回應片段寫入目標容器
#[derive(Clone)]
pub struct FetchBinder {
    triggers: Arc<HashMap<String, TriggerDescriptor>>,
    fetcher: Arc<dyn FragmentFetcher>,
    state: Arc<RwLock<BinderState>>,
    options: BinderOptions,
}

impl FetchBinder {
    pub fn new(mount: MountPoint, fetcher: Arc<dyn FragmentFetcher>) -> Self {
        Self {
            triggers: Arc::new(HashMap::new()),
            fetcher,
            state: Arc::new(RwLock::new(BinderState {
                mount,
                generations: HashMap::new(),
            })),
            options: BinderOptions::default(),
        }
    }

    /// 啟動頁面並登記啟動器提供的所有觸發器
    pub fn bootstrap(
        bootstrapper: &Bootstrapper,
        document: ShellDocument,
        fetcher: Arc<dyn FragmentFetcher>,
    ) -> Result<Self> {
        let mount = bootstrapper.mount(document)?;
        let mut binder = Self::new(mount, fetcher);
        for (element_id, descriptor) in bootstrapper.registrations() {
            binder = binder.register(&element_id, descriptor);
        }
        Ok(binder)
    }

    pub fn with_options(mut self, options: BinderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn register(mut self, element_id: &str, descriptor: TriggerDescriptor) -> Self {
        Arc::make_mut(&mut self.triggers).insert(element_id.to_string(), descriptor);
        self
    }

    pub fn descriptor(&self, element_id: &str) -> Option<&TriggerDescriptor> {
        self.triggers.get(element_id)
    }

    pub async fn mount(&self) -> MountPoint {
        self.state.read().await.mount.clone()
    }

    pub async fn inner_html(&self, id: &str) -> Option<String> {
        self.state.read().await.mount.inner_html(id)
    }

    pub async fn text_of(&self, id: &str) -> Option<String> {
        self.state.read().await.mount.text_of(id)
    }

    pub async fn click(&self, element_id: &str) -> Result<SwapOutcome> {
        self.dispatch(element_id, TriggerEvent::Click).await
    }

    /// 每次觸發都各自送出請求，沒有取消機制
    pub async fn dispatch(&self, element_id: &str, event: TriggerEvent) -> Result<SwapOutcome> {
        let descriptor = self
            .triggers
            .get(element_id)
            .ok_or_else(|| AppError::UnknownTrigger {
                element_id: element_id.to_string(),
            })?;

        if descriptor.event != event {
            return Err(AppError::EventMismatch {
                element_id: element_id.to_string(),
                expected: descriptor.event.to_string(),
                received: event.to_string(),
            });
        }

        let generation = {
            let mut state = self.state.write().await;
            if !state.mount.contains(&descriptor.target) {
                return Err(AppError::TargetMissing {
                    selector: descriptor.target_selector(),
                });
            }
            let counter = state
                .generations
                .entry(descriptor.target.clone())
                .or_insert(0);
            *counter += 1;
            *counter
        };

        tracing::debug!(
            "🖱️ {} on '#{}' -> {} {} (generation {})",
            event,
            element_id,
            descriptor.method,
            descriptor.path,
            generation
        );

        let result = self.fetcher.fetch(descriptor.method, &descriptor.path).await;

        let mut state = self.state.write().await;
        if self.options.ordering == SwapOrdering::LatestTrigger {
            let latest = state
                .generations
                .get(&descriptor.target)
                .copied()
                .unwrap_or(generation);
            if latest != generation {
                tracing::debug!(
                    "Discarding response for '{}' (generation {} < {})",
                    descriptor.target_selector(),
                    generation,
                    latest
                );
                return Ok(SwapOutcome::Superseded {
                    target: descriptor.target.clone(),
                    generation,
                });
            }
        }

        let reason = match result {
            Ok(response) if response.is_success() => {
                let bytes = response.body.len();
                state.mount.swap_inner(&descriptor.target, response.body)?;
                tracing::debug!("Swapped {} bytes into '{}'", bytes, descriptor.target_selector());
                return Ok(SwapOutcome::Swapped {
                    target: descriptor.target.clone(),
                    bytes,
                });
            }
            Ok(response) => format!("HTTP status {}", response.status),
            Err(e) => e.to_string(),
        };

        tracing::warn!(
            "⚠️ {} {} failed: {}",
            descriptor.method,
            descriptor.path,
            reason
        );

        let rendered = match self.options.on_failure {
            FailurePolicy::Silent => false,
            FailurePolicy::Message => {
                state
                    .mount
                    .swap_inner(&descriptor.target, self.options.failure_message.clone())?;
                true
            }
        };

        Ok(SwapOutcome::Failed {
            target: descriptor.target.clone(),
            reason,
            rendered,
        })
    }
}

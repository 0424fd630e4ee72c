use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kinesis_tool::*;
use kinesis_types::*;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
#[error("connection reset")]
struct Backend;

impl From<Backend> for ToolError {
    fn from(e: Backend) -> Self {
        ToolError::ExecutionFailed(Box::new(e))
    }
}

#[derive(Debug, Deserialize)]
struct DropArgs {
    name: String,
}

/// A destructive tool that counts how often it actually ran.
struct DropTool {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl Tool for DropTool {
    const NAME: &'static str = "drop_thing";
    type Args = DropArgs;
    type Output = String;
    type Error = Backend;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.into(),
            title: None,
            description: "Drop a thing".into(),
            arguments: ArgSchema::new().field(Field::string("name").len(1, 8).required()),
            annotations: Some(ToolAnnotations::destructive()),
        }
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Self::Output, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Backend);
        }
        Ok(format!("dropped {}", args.name))
    }
}

fn registry(fail: bool, propagate: bool, allow: bool) -> (ToolRegistry, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = ToolRegistry::new();
    registry.register(DropTool {
        calls: Arc::clone(&calls),
        fail,
    });
    let guard = DestructiveActionGuard::new(&registry, allow);
    registry
        .add_middleware(CallTracer)
        .add_middleware(ErrorNormalizer::new(propagate))
        .add_middleware(guard);
    (registry, calls)
}

#[tokio::test]
async fn runtime_failure_becomes_none() {
    let (registry, calls) = registry(true, false, true);
    let out = registry
        .execute("drop_thing", json!({"name": "a"}), &ToolContext::default())
        .await
        .unwrap();
    assert!(out.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn runtime_failure_propagates_in_test_mode() {
    let (registry, _) = registry(true, true, true);
    let err = registry
        .execute("drop_thing", json!({"name": "a"}), &ToolContext::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "execution failed: connection reset");
}

#[tokio::test]
async fn validation_failure_always_propagates() {
    for propagate in [false, true] {
        let (registry, calls) = registry(true, propagate, true);
        let err = registry
            .execute("drop_thing", json!({"name": "far too long"}), &ToolContext::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn guard_blocks_destructive_tool_when_disallowed() {
    let (registry, calls) = registry(false, false, false);
    let out = registry
        .execute("drop_thing", json!({"name": "a"}), &ToolContext::default())
        .await
        .unwrap();
    assert_eq!(out.text_content(), DESTRUCTIVE_ACTIONS_DISABLED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn guard_allows_when_enabled() {
    let (registry, calls) = registry(false, false, true);
    let out = registry
        .execute("drop_thing", json!({"name": "a"}), &ToolContext::default())
        .await
        .unwrap();
    assert_eq!(out.structured_content, Some(json!("dropped a")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn guard_uses_custom_advisory() {
    let mut registry = ToolRegistry::new();
    registry.register(DropTool {
        calls: Arc::new(AtomicUsize::new(0)),
        fail: false,
    });
    let guard = DestructiveActionGuard::new(&registry, false).with_advisory("nope");
    assert!(guard.blocks("drop_thing"));
    assert!(!guard.blocks("other"));
    assert!(!DestructiveActionGuard::new(&registry, true).blocks("drop_thing"));
}

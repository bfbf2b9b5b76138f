//! Tools an engine may call on a persona's behalf.
//!
//! Same shape as the engine port: an RPITIT `Tool` trait for implementations,
//! a blanket object-safe `ToolDyn`, and `BoxTool` for heterogeneous lists.

pub mod hash;
pub mod image;
pub mod store;

use std::future::Future;
use std::pin::Pin;

use starlet_types::tool::{ToolDeclaration, ToolOutcome};

/// A function the model can call.
pub trait Tool: Send + Sync {
    /// Name, description and argument schema shown to the model.
    fn declaration(&self) -> ToolDeclaration;

    /// Execute with model-supplied arguments.
    ///
    /// Infallible by contract: failures are reported inside the returned
    /// JSON so the model can react to them.
    fn call(&self, args: serde_json::Value)
    -> impl Future<Output = serde_json::Value> + Send;
}

/// Object-safe version of [`Tool`].
pub trait ToolDyn: Send + Sync {
    fn declaration(&self) -> ToolDeclaration;

    fn call_boxed(
        &self,
        args: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = serde_json::Value> + Send + '_>>;
}

impl<T: Tool> ToolDyn for T {
    fn declaration(&self) -> ToolDeclaration {
        Tool::declaration(self)
    }

    fn call_boxed(
        &self,
        args: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = serde_json::Value> + Send + '_>> {
        Box::pin(self.call(args))
    }
}

/// Type-erased tool.
pub struct BoxTool {
    inner: Box<dyn ToolDyn>,
}

impl BoxTool {
    pub fn new<T: Tool + 'static>(tool: T) -> Self {
        Self {
            inner: Box::new(tool),
        }
    }

    pub fn declaration(&self) -> ToolDeclaration {
        self.inner.declaration()
    }

    pub async fn call(&self, args: serde_json::Value) -> serde_json::Value {
        self.inner.call_boxed(args).await
    }
}

/// The tools available to one engine, looked up by name.
#[derive(Default)]
pub struct ToolSet {
    tools: Vec<BoxTool>,
}

impl ToolSet {
    pub fn new(tools: Vec<BoxTool>) -> Self {
        Self { tools }
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools.iter().map(BoxTool::declaration).collect()
    }

    /// Dispatch a call by tool name. Unknown names get an error outcome.
    pub async fn call(&self, name: &str, args: serde_json::Value) -> serde_json::Value {
        match self.tools.iter().find(|t| t.declaration().name == name) {
            Some(tool) => tool.call(args).await,
            None => {
                tracing::warn!(tool = name, "Model called an unknown tool");
                ToolOutcome::error(format!("unknown tool: {name}")).to_json()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    impl Tool for Echo {
        fn declaration(&self) -> ToolDeclaration {
            ToolDeclaration {
                name: "echo".to_string(),
                description: "Echo the arguments back.".to_string(),
                parameters: json!({"type": "object"}),
            }
        }

        async fn call(&self, args: serde_json::Value) -> serde_json::Value {
            json!({"status": "success", "echo": args})
        }
    }

    #[tokio::test]
    async fn test_tool_set_dispatches_by_name() {
        let tools = ToolSet::new(vec![BoxTool::new(Echo)]);
        let result = tools.call("echo", json!({"x": 1})).await;
        assert_eq!(result["echo"]["x"], 1);
    }

    #[tokio::test]
    async fn test_tool_set_unknown_tool() {
        let tools = ToolSet::new(vec![BoxTool::new(Echo)]);
        let result = tools.call("paint", json!({})).await;
        assert_eq!(result["status"], "error");
        assert_eq!(result["message"], "unknown tool: paint");
    }

    #[test]
    fn test_declarations() {
        let tools = ToolSet::new(vec![BoxTool::new(Echo)]);
        let decls = tools.declarations();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "echo");
        assert!(ToolSet::default().is_empty());
    }
}

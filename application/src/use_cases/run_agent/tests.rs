use super::*;
use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{GatewayError, LlmSession};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use workbench_domain::{
    ContentBlock, FailureKind, LlmResponse, MessageContent, Model, Role, StopReason, ToolDefinition,
    ToolErrorKind, ToolKind, ToolSpec,
};

// ==================== Flow Test Infrastructure ====================

/// A scripted reply for the mock session
enum Scripted {
    Response(LlmResponse),
    Error(String),
    /// Never answers; used to exercise cancellation of in-flight requests
    Hang,
}

#[derive(Default)]
struct Script {
    replies: Mutex<VecDeque<Scripted>>,
    /// History length observed on every call
    seen_history_lens: Mutex<Vec<usize>>,
    /// Number of tool declarations observed on every call
    seen_tool_counts: Mutex<Vec<usize>>,
    system_prompts: Mutex<Vec<String>>,
}

struct ScriptedSession {
    model: Model,
    script: Arc<Script>,
}

#[async_trait]
impl LlmSession for ScriptedSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send_with_tools(
        &self,
        history: &ConversationHistory,
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError> {
        self.script.seen_history_lens.lock().unwrap().push(history.len());
        self.script.seen_tool_counts.lock().unwrap().push(tools.len());
        let next = self.script.replies.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Response(r)) => Ok(r),
            Some(Scripted::Error(e)) => Err(GatewayError::RequestFailed(e)),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Ok(LlmResponse::from_text("(no more responses)")),
        }
    }
}

struct ScriptedGateway {
    script: Arc<Script>,
}

impl ScriptedGateway {
    fn new(replies: Vec<Scripted>) -> Self {
        let script = Script {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        };
        Self {
            script: Arc::new(script),
        }
    }

    fn calls(&self) -> usize {
        self.script.seen_history_lens.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.script
            .system_prompts
            .lock()
            .unwrap()
            .push(system_prompt.to_string());
        Ok(Box::new(ScriptedSession {
            model: model.clone(),
            script: self.script.clone(),
        }))
    }
}

/// Mock tool executor that records calls and echoes their arguments
struct RecordingExecutor {
    spec: ToolSpec,
    calls: Mutex<Vec<String>>,
    /// Per-tool artificial latency
    delays: Vec<(String, Duration)>,
}

impl RecordingExecutor {
    fn new() -> Self {
        let spec = ToolKind::ALL
            .into_iter()
            .fold(ToolSpec::new(), |spec, kind| {
                spec.register(ToolDefinition::new(kind, kind.as_str()))
            });
        Self {
            spec,
            calls: Mutex::new(Vec::new()),
            delays: Vec::new(),
        }
    }

    fn with_delay(mut self, tool: &str, delay: Duration) -> Self {
        self.delays.push((tool.to_string(), delay));
        self
    }

    fn recorded(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolExecutorPort for RecordingExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        if let Some((_, delay)) = self.delays.iter().find(|(t, _)| *t == call.tool_name) {
            tokio::time::sleep(*delay).await;
        }
        self.calls.lock().unwrap().push(call.tool_name.clone());

        let result = if self.has_tool(&call.tool_name) {
            ToolResult::success(
                &call.tool_name,
                format!("ok: {}", call.get_string("path").unwrap_or("-")),
            )
        } else {
            ToolResult::failure(&call.tool_name, ToolError::unknown_tool(&call.tool_name))
        };
        result.with_call_id(call.native_id.clone())
    }
}

struct NameOnlySchema;

impl ToolSchemaPort for NameOnlySchema {
    fn tool_to_schema(&self, tool: &workbench_domain::ToolDefinition) -> serde_json::Value {
        json!({ "name": tool.name })
    }
}

#[derive(Default)]
struct RecordingProgress {
    phases: Mutex<Vec<AgentPhase>>,
    turns: Mutex<Vec<(usize, usize)>>,
    failures: Mutex<Vec<FailureKind>>,
    not_found: Mutex<Vec<String>>,
}

impl AgentProgressNotifier for RecordingProgress {
    fn on_phase_change(&self, phase: &AgentPhase) {
        self.phases.lock().unwrap().push(*phase);
    }

    fn on_turn_start(&self, turn: usize, max_turns: usize) {
        self.turns.lock().unwrap().push((turn, max_turns));
    }

    fn on_tool_not_found(&self, tool_name: &str, _available_tools: &[&str]) {
        self.not_found.lock().unwrap().push(tool_name.to_string());
    }

    fn on_failed(&self, kind: FailureKind, _message: &str) {
        self.failures.lock().unwrap().push(kind);
    }
}

#[derive(Default)]
struct RecordingLogger {
    events: Mutex<Vec<&'static str>>,
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events.lock().unwrap().push(event.event_type);
    }
}

fn calls(calls: Vec<ToolCall>) -> Scripted {
    Scripted::Response(LlmResponse::from_tool_calls(calls))
}

fn text(t: &str) -> Scripted {
    Scripted::Response(LlmResponse::from_text(t))
}

fn use_case(
    gateway: Arc<ScriptedGateway>,
    executor: Arc<RecordingExecutor>,
) -> RunAgentUseCase<ScriptedGateway, RecordingExecutor> {
    RunAgentUseCase::new(gateway, executor, Arc::new(NameOnlySchema))
}

fn input(task: &str) -> RunAgentInput {
    RunAgentInput::new(task, Model::default())
}

fn tool_results(message: &Message) -> &[ToolResult] {
    match &message.content {
        MessageContent::ToolResults { results } => results,
        other => panic!("expected tool results, got {:?}", other),
    }
}

// ==================== Flow Tests ====================

#[tokio::test]
async fn test_final_answer_on_first_turn() {
    let gateway = Arc::new(ScriptedGateway::new(vec![text("Nothing to do.")]));
    let executor = Arc::new(RecordingExecutor::new());

    let output = use_case(gateway.clone(), executor.clone())
        .execute(input("say hi"))
        .await
        .unwrap();

    assert_eq!(output.final_text, "Nothing to do.");
    assert_eq!(output.turns, 1);
    assert_eq!(output.history.len(), 2);
    assert_eq!(output.history.last().unwrap().role, Role::Model);
    assert!(executor.recorded().is_empty());
    assert_eq!(*gateway.script.seen_tool_counts.lock().unwrap(), vec![4]);
}

#[tokio::test]
async fn test_tool_loop_feeds_results_back() {
    let gateway = Arc::new(ScriptedGateway::new(vec![
        calls(vec![ToolCall::new("read_file").with_arg("path", "main.py")]),
        text("The file prints hello."),
    ]));
    let executor = Arc::new(RecordingExecutor::new());

    let output = use_case(gateway.clone(), executor.clone())
        .execute(input("what does main.py do?"))
        .await
        .unwrap();

    assert_eq!(output.turns, 2);
    assert_eq!(executor.recorded(), vec!["read_file"]);

    let roles: Vec<Role> = output.history.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Model, Role::Tool, Role::Model]);

    let results = tool_results(&output.history.messages()[2]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].output(), Some("ok: main.py"));
    assert_eq!(results[0].call_id.as_deref(), Some("call_0"));

    // Second request carried user + model call + tool results
    assert_eq!(*gateway.script.seen_history_lens.lock().unwrap(), vec![1, 3]);
}

#[tokio::test]
async fn test_all_results_of_a_turn_in_one_message_in_order() {
    let gateway = Arc::new(ScriptedGateway::new(vec![
        calls(vec![
            ToolCall::new("list_directory"),
            ToolCall::new("read_file").with_arg("path", "a.py"),
            ToolCall::new("read_file").with_arg("path", "b.py"),
        ]),
        text("done"),
    ]));
    let executor = Arc::new(RecordingExecutor::new());

    let output = use_case(gateway, executor.clone())
        .execute(input("look around"))
        .await
        .unwrap();

    assert_eq!(output.history.len(), 4);
    let results = tool_results(&output.history.messages()[2]);
    let outputs: Vec<_> = results.iter().map(|r| r.output().unwrap()).collect();
    assert_eq!(outputs, vec!["ok: -", "ok: a.py", "ok: b.py"]);
    assert_eq!(executor.recorded(), vec!["list_directory", "read_file", "read_file"]);
}

#[tokio::test]
async fn test_parallel_tools_preserve_request_order() {
    let gateway = Arc::new(ScriptedGateway::new(vec![
        calls(vec![
            ToolCall::new("run_script").with_arg("path", "slow.py"),
            ToolCall::new("read_file").with_arg("path", "fast.txt"),
        ]),
        text("done"),
    ]));
    let executor = Arc::new(
        RecordingExecutor::new().with_delay("run_script", Duration::from_millis(50)),
    );

    let output = use_case(gateway, executor.clone())
        .execute(input("go").with_params(ExecutionParams::default().with_parallel_tools(true)))
        .await
        .unwrap();

    // Completion order differs from request order...
    assert_eq!(executor.recorded(), vec!["read_file", "run_script"]);
    // ...but the recorded results follow the request
    let results = tool_results(&output.history.messages()[2]);
    assert_eq!(results[0].tool_name, "run_script");
    assert_eq!(results[1].tool_name, "read_file");
}

#[tokio::test]
async fn test_unknown_tool_is_fed_back_and_loop_continues() {
    let gateway = Arc::new(ScriptedGateway::new(vec![
        calls(vec![ToolCall::new("delete_everything")]),
        text("Sorry, I will not do that."),
    ]));
    let executor = Arc::new(RecordingExecutor::new());
    let progress = Arc::new(RecordingProgress::default());

    let output = use_case(gateway, executor)
        .with_progress(progress.clone())
        .execute(input("clean up"))
        .await
        .unwrap();

    let results = tool_results(&output.history.messages()[2]);
    let error = results[0].error().unwrap();
    assert_eq!(error.kind, ToolErrorKind::UnknownTool);
    assert_eq!(error.message, "Unknown function: delete_everything");
    assert_eq!(*progress.not_found.lock().unwrap(), vec!["delete_everything"]);
    assert_eq!(output.final_text, "Sorry, I will not do that.");
}

#[tokio::test]
async fn test_budget_exhausted() {
    let replies = (0..10)
        .map(|_| calls(vec![ToolCall::new("list_directory")]))
        .collect();
    let gateway = Arc::new(ScriptedGateway::new(replies));
    let executor = Arc::new(RecordingExecutor::new());
    let progress = Arc::new(RecordingProgress::default());

    let err = use_case(gateway.clone(), executor.clone())
        .with_progress(progress.clone())
        .execute(input("loop forever").with_params(ExecutionParams::default().with_max_turns(3)))
        .await
        .unwrap_err();

    assert!(matches!(err, RunAgentError::BudgetExhausted { max_turns: 3 }));
    assert_eq!(err.failure_kind(), FailureKind::BudgetExhausted);
    assert_eq!(gateway.calls(), 3);
    assert_eq!(executor.recorded().len(), 3);
    assert_eq!(*progress.turns.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!(progress.phases.lock().unwrap().last(), Some(&AgentPhase::Failed));
    assert_eq!(*progress.failures.lock().unwrap(), vec![FailureKind::BudgetExhausted]);
}

#[tokio::test]
async fn test_default_budget_is_twenty_turns() {
    let replies = (0..25)
        .map(|_| calls(vec![ToolCall::new("list_directory")]))
        .collect();
    let gateway = Arc::new(ScriptedGateway::new(replies));
    let executor = Arc::new(RecordingExecutor::new());

    let err = use_case(gateway.clone(), executor)
        .execute(input("loop forever"))
        .await
        .unwrap_err();

    assert!(matches!(err, RunAgentError::BudgetExhausted { max_turns: 20 }));
    assert_eq!(gateway.calls(), 20);
}

#[tokio::test]
async fn test_empty_response_is_upstream_failure() {
    let empty = LlmResponse {
        content: vec![ContentBlock::Text("   ".to_string())],
        stop_reason: Some(StopReason::EndTurn),
        model: None,
        usage: None,
    };
    let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Response(empty)]));
    let executor = Arc::new(RecordingExecutor::new());

    let err = use_case(gateway, executor)
        .execute(input("anything"))
        .await
        .unwrap_err();

    assert!(matches!(err, RunAgentError::EmptyResponse));
    assert_eq!(err.failure_kind(), FailureKind::UpstreamFailure);
}

#[tokio::test]
async fn test_gateway_error_is_upstream_failure() {
    let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Error(
        "503 unavailable".to_string(),
    )]));
    let executor = Arc::new(RecordingExecutor::new());
    let logger = Arc::new(RecordingLogger::default());

    let err = use_case(gateway, executor)
        .with_conversation_logger(logger.clone())
        .execute(input("anything"))
        .await
        .unwrap_err();

    assert!(matches!(err, RunAgentError::Gateway(GatewayError::RequestFailed(_))));
    assert_eq!(err.failure_kind(), FailureKind::UpstreamFailure);
    assert_eq!(*logger.events.lock().unwrap(), vec!["user_task", "agent_failed"]);
}

#[tokio::test]
async fn test_cancelled_before_first_turn() {
    let gateway = Arc::new(ScriptedGateway::new(vec![text("never")]));
    let executor = Arc::new(RecordingExecutor::new());
    let token = CancellationToken::new();
    token.cancel();

    let err = use_case(gateway.clone(), executor)
        .with_cancellation(token)
        .execute(input("anything"))
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(err.failure_kind(), FailureKind::Cancelled);
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_cancel_interrupts_in_flight_request() {
    let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Hang]));
    let executor = Arc::new(RecordingExecutor::new());
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let err = use_case(gateway, executor)
        .with_cancellation(token)
        .execute(input("anything"))
        .await
        .unwrap_err();

    assert!(matches!(err, RunAgentError::Cancelled));
}

#[tokio::test]
async fn test_usage_is_accumulated() {
    let gateway = Arc::new(ScriptedGateway::new(vec![
        Scripted::Response(
            LlmResponse::from_tool_calls(vec![ToolCall::new("list_directory")])
                .with_usage(TokenUsage::new(100, 10)),
        ),
        Scripted::Response(LlmResponse::from_text("done").with_usage(TokenUsage::new(150, 5))),
    ]));
    let executor = Arc::new(RecordingExecutor::new());

    let output = use_case(gateway, executor)
        .execute(input("anything"))
        .await
        .unwrap();

    assert_eq!(output.usage, TokenUsage::new(250, 15));
}

#[tokio::test]
async fn test_empty_task_is_rejected() {
    let gateway = Arc::new(ScriptedGateway::new(vec![]));
    let executor = Arc::new(RecordingExecutor::new());

    let err = use_case(gateway.clone(), executor)
        .execute(input("   "))
        .await
        .unwrap_err();

    assert!(matches!(err, RunAgentError::InvalidState(DomainError::EmptyTask)));
    assert_eq!(err.failure_kind(), FailureKind::Internal);
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_system_prompt_and_transcript_events() {
    let gateway = Arc::new(ScriptedGateway::new(vec![
        calls(vec![ToolCall::new("read_file").with_arg("path", "x")]),
        text("done"),
    ]));
    let executor = Arc::new(RecordingExecutor::new());
    let logger = Arc::new(RecordingLogger::default());
    let progress = Arc::new(RecordingProgress::default());

    use_case(gateway.clone(), executor)
        .with_conversation_logger(logger.clone())
        .with_progress(progress.clone())
        .execute(input("anything").with_system_prompt("be brief"))
        .await
        .unwrap();

    assert_eq!(*gateway.script.system_prompts.lock().unwrap(), vec!["be brief"]);
    assert_eq!(
        *logger.events.lock().unwrap(),
        vec![
            "user_task",
            "llm_response",
            "tool_call",
            "tool_result",
            "llm_response",
            "agent_done"
        ]
    );
    assert_eq!(
        *progress.phases.lock().unwrap(),
        vec![
            AgentPhase::AwaitingModel,
            AgentPhase::ExecutingTools,
            AgentPhase::AwaitingModel,
            AgentPhase::Done
        ]
    );
}

#[test]
fn test_failure_kind_mapping() {
    assert_eq!(
        RunAgentError::Gateway(GatewayError::Timeout).failure_kind(),
        FailureKind::UpstreamFailure
    );
    assert_eq!(RunAgentError::Cancelled.failure_kind(), FailureKind::Cancelled);
    assert_eq!(
        RunAgentError::InvalidState(DomainError::InvalidTransition {
            from: AgentPhase::Done,
            to: AgentPhase::AwaitingModel,
        })
        .failure_kind(),
        FailureKind::Internal
    );
    assert_eq!(
        RunAgentError::BudgetExhausted { max_turns: 20 }.to_string(),
        "Turn budget exhausted after 20 turns without a final answer"
    );
}

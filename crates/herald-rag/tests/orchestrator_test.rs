mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{library, seeded_store, PausingStore, ScriptedClient, StalledClient};
use herald_llm::Role;
use herald_persist::{KvPersistenceClient, MessageRole, PersistenceClient};
use herald_rag::{QueryOrchestrator, RagConfig, RagError};

fn orchestrator(
    client: Arc<dyn herald_llm::ChatClient>,
    store: Arc<dyn PersistenceClient>,
) -> QueryOrchestrator {
    QueryOrchestrator::builder()
        .llm_client(client)
        .store(store)
        .config(RagConfig::new("test-model"))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_empty_library_returns_fallback_without_llm() {
    let client = ScriptedClient::new(vec![]);
    let store: Arc<dyn PersistenceClient> = Arc::new(KvPersistenceClient::in_memory());
    let orch = orchestrator(client.clone(), store.clone());

    let outcome = orch.query("session-1", "anything new?").await.unwrap();

    assert_eq!(
        outcome.response,
        "No documents have been ingested yet. Please go to the Ingestion panel."
    );
    assert!(outcome.sources.is_empty());
    assert_eq!(client.call_count(), 0);
    assert!(store.get_logs().await.unwrap().is_empty());
    assert!(store.get_session("session-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_successful_query_records_log_and_two_turns() {
    let client = ScriptedClient::new(vec!["2, 0", "Plasma was sustained for minutes."]);
    let store = seeded_store(library()).await;
    let orch = orchestrator(client.clone(), store.clone());

    let outcome = orch.query("session-1", "  fusion news?  ").await.unwrap();

    assert_eq!(outcome.response, "Plasma was sustained for minutes.");
    let ids: Vec<&str> = outcome.sources.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "t1"]);

    let logs = store.get_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user_query, "fusion news?");
    assert_eq!(logs[0].tokens, Some(15));
    assert_eq!(logs[0].response_time_ms, outcome.response_time_ms);

    let session = store.get_session("session-1").await.unwrap().unwrap();
    assert_eq!(session.history.len(), 2);
    assert_eq!(session.history[0].role, MessageRole::User);
    assert_eq!(session.history[1].role, MessageRole::Assistant);
    assert_eq!(session.last_used, session.history[1].timestamp);
    assert!(session.history[0].timestamp <= session.history[1].timestamp);

    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].messages[0]
        .content()
        .contains("ID: 2 | Title: Fusion reactor sustains plasma"));

    let generation = &requests[1].messages;
    assert_eq!(generation[0].role(), Role::System);
    assert!(generation[0].content().contains("expert News Analyst"));
    assert!(generation[1]
        .content()
        .contains("Source: Example Wire (2024-05-20)\nTitle: Fusion reactor sustains plasma"));
    assert!(generation[1].content().ends_with("User Query: fusion news?"));
}

#[tokio::test]
async fn test_invalid_selection_tokens_are_ignored() {
    let client = ScriptedClient::new(vec!["9, one, 1, 1", "Rates are unchanged."]);
    let store = seeded_store(library()).await;
    let orch = orchestrator(client, store);

    let outcome = orch.query("s", "rates?").await.unwrap();
    assert_eq!(outcome.sources.len(), 1);
    assert_eq!(outcome.sources[0].id, "f1");
}

#[tokio::test]
async fn test_history_window_feeds_generation_prompt() {
    let client = ScriptedClient::new(vec!["0", "first", "0", "second", "0", "third"]);
    let store = seeded_store(library()).await;
    let orch = orchestrator(client.clone(), store.clone());

    orch.query("s", "q1").await.unwrap();
    orch.query("s", "q2").await.unwrap();
    orch.query("s", "q3").await.unwrap();

    let requests = client.requests();
    let last_prompt = requests[5].messages[1].content().to_string();
    assert!(last_prompt.contains("Chat History:\nuser: q1\nassistant: first\nuser: q2\nassistant: second"));

    assert_eq!(orch.history("s").await.unwrap().len(), 6);

    // Only the last four messages reach the prompt
    let client = ScriptedClient::new(vec!["0", "fourth"]);
    let orch = orchestrator(client.clone(), store);
    orch.query("s", "q4").await.unwrap();
    let prompt = client.requests()[1].messages[1].content().to_string();
    assert!(!prompt.contains("user: q1"));
    assert!(prompt.contains("user: q2\nassistant: second\nuser: q3\nassistant: third"));
}

#[tokio::test]
async fn test_empty_generation_uses_fallback_text() {
    let client = ScriptedClient::new(vec!["0", "   "]);
    let store = seeded_store(library()).await;
    let orch = orchestrator(client, store);

    let outcome = orch.query("s", "hello").await.unwrap();
    assert_eq!(outcome.response, "I'm sorry, I couldn't generate a response.");
}

#[tokio::test]
async fn test_empty_query_rejected_before_io() {
    let client = ScriptedClient::new(vec![]);
    let store = seeded_store(library()).await;
    let orch = orchestrator(client.clone(), store);

    let err = orch.query("s", "   ").await.unwrap_err();
    assert!(matches!(err, RagError::EmptyQuery));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_llm_failure_commits_nothing() {
    let client = ScriptedClient::failing("401 unauthorized");
    let store = seeded_store(library()).await;
    let orch = orchestrator(client, store.clone());

    let err = orch.query("s", "hello").await.unwrap_err();
    assert!(matches!(err, RagError::Llm(_)));
    assert!(store.get_logs().await.unwrap().is_empty());
    assert!(store.get_session("s").await.unwrap().is_none());
    assert!(!orch.gate().is_busy("s"));
}

#[tokio::test]
async fn test_reset_session_starts_fresh() {
    let client = ScriptedClient::new(vec!["0", "one"]);
    let store = seeded_store(library()).await;
    let orch = orchestrator(client.clone(), store.clone());

    orch.query("s", "q1").await.unwrap();
    orch.reset_session("s").await.unwrap();
    assert!(store.get_session("s").await.unwrap().is_none());
    assert!(orch.history("s").await.unwrap().is_empty());

    client.push("0");
    client.push("two");
    orch.query("s", "q2").await.unwrap();

    let prompt = client.requests()[3].messages[1].content().to_string();
    assert!(!prompt.contains("q1"));
    assert_eq!(orch.history("s").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_busy_session_and_cancellation() {
    let store = seeded_store(library()).await;
    let orch = Arc::new(orchestrator(Arc::new(StalledClient), store.clone()));

    let running = {
        let orch = Arc::clone(&orch);
        tokio::spawn(async move { orch.query("s", "slow question").await })
    };

    for _ in 0..100 {
        if orch.gate().is_busy("s") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(orch.gate().is_busy("s"));

    let err = orch.query("s", "second").await.unwrap_err();
    assert!(matches!(err, RagError::SessionBusy(_)));

    assert!(orch.cancel("s"));
    let result = running.await.unwrap();
    assert!(matches!(result, Err(RagError::Cancelled(_))));

    assert!(store.get_logs().await.unwrap().is_empty());
    assert!(store.get_session("s").await.unwrap().is_none());
    assert!(!orch.cancel("s"));
}

#[tokio::test]
async fn test_other_sessions_are_not_blocked() {
    let store = seeded_store(library()).await;
    let stalled = Arc::new(orchestrator(Arc::new(StalledClient), store.clone()));

    let _running = {
        let orch = Arc::clone(&stalled);
        tokio::spawn(async move { orch.query("a", "slow").await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(stalled.gate().is_busy("a"));
    assert!(stalled.gate().acquire("b").is_some());
}

#[tokio::test]
async fn test_reset_during_commit_removes_committed_turns() {
    let store = PausingStore::seeded(library()).await;
    let client = ScriptedClient::new(vec!["0", "answer"]);
    let orch = Arc::new(orchestrator(client, store.clone()));

    let running = {
        let orch = Arc::clone(&orch);
        tokio::spawn(async move { orch.query("s", "q").await })
    };
    store.entered.notified().await;

    let reset = {
        let orch = Arc::clone(&orch);
        tokio::spawn(async move { orch.reset_session("s").await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!reset.is_finished());

    store.release.notify_one();
    running.await.unwrap().unwrap();
    reset.await.unwrap().unwrap();

    assert!(store.get_session("s").await.unwrap().is_none());
    assert_eq!(store.get_logs().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reset_before_commit_writes_nothing() {
    let store = seeded_store(library()).await;
    let orch = Arc::new(orchestrator(Arc::new(StalledClient), store.clone()));

    let running = {
        let orch = Arc::clone(&orch);
        tokio::spawn(async move { orch.query("s", "slow").await })
    };
    for _ in 0..100 {
        if orch.gate().is_busy("s") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    orch.reset_session("s").await.unwrap();
    assert!(matches!(running.await.unwrap(), Err(RagError::Cancelled(_))));
    assert!(store.get_session("s").await.unwrap().is_none());
    assert!(store.get_logs().await.unwrap().is_empty());
}

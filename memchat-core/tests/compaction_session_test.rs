use memchat_core::llm::{LLMProvider, MockFailure, MockProvider, MockStep};
use memchat_core::store::{FileSessionStore, SessionStore};
use memchat_core::{
    ChatSession, CompactionPolicy, ConversationCompactor, LlmSummarizer, SessionId, TurnRole,
    compact,
};
use std::sync::Arc;

fn open_session(provider: &MockProvider, store: Arc<dyn SessionStore>, id: &str) -> ChatSession {
    let provider: Arc<dyn LLMProvider> = Arc::new(provider.clone());
    let summarizer = LlmSummarizer::new(provider.clone(), "mock-echo");
    let compactor = ConversationCompactor::new(CompactionPolicy::default(), Arc::new(summarizer));
    ChatSession::resume(SessionId::new(id).unwrap(), provider, compactor, store, "mock-echo")
        .unwrap()
}

#[tokio::test]
async fn transcript_survives_a_restart() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(temp_dir.path()));
    let provider = MockProvider::new();

    {
        let mut session = open_session(&provider, store.clone(), "1");
        session.send("My name is Ada.").await.unwrap();
        session.send("What is my name?").await.unwrap();
    }

    let resumed = open_session(&provider, store.clone(), "1");
    let texts: Vec<&str> = resumed.transcript().iter().map(|t| t.text()).collect();
    assert_eq!(
        texts,
        vec![
            "My name is Ada.",
            "mock-echo: My name is Ada.",
            "What is my name?",
            "mock-echo: What is my name?"
        ]
    );

    let other = open_session(&provider, store, "2");
    assert!(other.transcript().is_empty());
}

#[tokio::test]
async fn long_chat_stays_bounded_and_keeps_its_opening() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(temp_dir.path()));
    let provider = MockProvider::new();
    let mut session = open_session(&provider, store.clone(), "long");

    for i in 1..=20 {
        let input = format!("question {i}");
        session.send(&input).await.unwrap();

        let turns = session.transcript().turns();
        // preserved head + summary + latest user turn + reply
        assert!(turns.len() <= 8, "turn {i}: {} turns", turns.len());
        assert_eq!(turns[turns.len() - 2].text(), input);
        assert_eq!(turns[0].text(), "question 1");
    }

    let stored = store.load(session.id()).unwrap();
    assert_eq!(&stored, session.transcript());
    assert!(
        stored
            .iter()
            .any(|turn| turn.role() == TurnRole::SystemSummary)
    );
}

#[tokio::test]
async fn eight_turns_are_sent_without_summarizing() {
    let provider = MockProvider::new();
    let store: Arc<dyn SessionStore> = Arc::new(memchat_core::MemorySessionStore::new());
    let mut session = open_session(&provider, store, "1");

    for i in 1..=4 {
        session.send(&format!("q{i}")).await.unwrap();
    }

    // 3 full exchanges plus the 4th question reached the model uncompacted
    assert_eq!(provider.call_count(), 4);
    assert_eq!(session.transcript().len(), 8);
    assert!(
        session
            .transcript()
            .iter()
            .all(|turn| turn.role() != TurnRole::SystemSummary)
    );
}

#[tokio::test]
async fn failed_summary_leaves_transcript_intact_for_the_caller() {
    let provider = MockProvider::from_steps(vec![MockStep::failure(MockFailure::Network)]);
    let summarizer = LlmSummarizer::new(Arc::new(provider.clone()), "mock-echo");

    let mut transcript = memchat_core::Transcript::new();
    for i in 1..=9 {
        transcript.push(TurnRole::User, format!("t{i}"));
    }
    let before = transcript.clone();

    let result = compact(&transcript, &CompactionPolicy::default(), &summarizer).await;
    assert!(matches!(
        result,
        Err(memchat_core::CompactionError::SummarizationUnavailable(_))
    ));
    assert_eq!(transcript, before);
    assert_eq!(provider.call_count(), 1);
}

//! End-to-end orchestration tests using stub generators.
//!
//! These run whole simulations through the public API and check the
//! emitted event sequence, the shared context, and failure recovery.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use colloquy_agents::{AgentSettings, GenerationError, PromptEngine, TextGenerator};
use colloquy_core::stub::{EchoGenerator, FailingGenerator};
use colloquy_core::{GlobalContext, RunState, Simulation, SimulationError};
use colloquy_types::{AgentConfig, ChatMessage, KnowledgeMode, SimulationEvent, TurnRecord};
use futures::StreamExt;

fn prompts() -> Arc<PromptEngine> {
    Arc::new(PromptEngine::builtin().unwrap())
}

fn build<G: TextGenerator>(
    scenario: &str,
    turns: u32,
    configs: Vec<AgentConfig>,
    generator: G,
) -> Result<Simulation<G>, SimulationError> {
    Simulation::new(
        scenario,
        turns,
        configs,
        &AgentSettings::default(),
        &prompts(),
        Arc::new(generator),
    )
}

fn messages(events: &[SimulationEvent]) -> Vec<TurnRecord> {
    events
        .iter()
        .filter_map(|event| match event {
            SimulationEvent::Message(record) => Some(record.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn two_agents_two_rounds_emit_four_turns_then_done() {
    let sim = build(
        "Strait crisis",
        2,
        vec![AgentConfig::named("A"), AgentConfig::named("B")],
        EchoGenerator,
    )
    .unwrap();

    let events: Vec<SimulationEvent> = sim.into_stream().collect().await;
    assert_eq!(events.len(), 5);

    let order: Vec<(String, u32)> = messages(&events)
        .into_iter()
        .map(|r| (r.speaker, r.round))
        .collect();
    assert_eq!(
        order,
        vec![
            (String::from("A"), 1),
            (String::from("B"), 1),
            (String::from("A"), 2),
            (String::from("B"), 2),
        ]
    );
    assert_eq!(events[4], SimulationEvent::Done { total_messages: 4 });
}

#[tokio::test]
async fn no_valid_agents_is_invalid_input() {
    let result = build(
        "s",
        2,
        vec![AgentConfig::named(""), AgentConfig::named("   ")],
        EchoGenerator,
    );
    assert!(matches!(result, Err(SimulationError::InvalidInput(_))));

    let result = build("s", 2, Vec::new(), EchoGenerator);
    assert!(matches!(result, Err(SimulationError::InvalidInput(_))));
}

#[tokio::test]
async fn nameless_configs_are_skipped() {
    let sim = build(
        "s",
        1,
        vec![
            AgentConfig::named(""),
            AgentConfig::named("B"),
            AgentConfig::named("C"),
        ],
        EchoGenerator,
    )
    .unwrap();
    let names: Vec<&str> = sim.agents().iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["B", "C"]);
}

#[tokio::test]
async fn failing_backend_yields_notices_and_normal_done() {
    let sim = build(
        "s",
        3,
        vec![
            AgentConfig::named("A"),
            AgentConfig::named("B"),
            AgentConfig::named("C"),
        ],
        FailingGenerator,
    )
    .unwrap();

    let events: Vec<SimulationEvent> = sim.into_stream().collect().await;
    let records = messages(&events);
    assert_eq!(records.len(), 9);
    assert!(
        records
            .iter()
            .all(|r| r.content.contains("text generation failed"))
    );
    assert_eq!(
        events.last(),
        Some(&SimulationEvent::Done { total_messages: 9 })
    );
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, SimulationEvent::Error(_)))
    );
}

#[tokio::test]
async fn context_is_reproducible_from_emitted_records() {
    let mut sim = build(
        "Energy corridor dispute",
        3,
        vec![AgentConfig::named("North"), AgentConfig::named("South")],
        EchoGenerator,
    )
    .unwrap();

    let mut records = Vec::new();
    while let Some(event) = sim.next_event().await {
        if let SimulationEvent::Message(record) = event {
            records.push(record);
            assert_eq!(
                GlobalContext::replay("Energy corridor dispute", &records),
                *sim.context()
            );
        }
    }
    assert_eq!(records.len(), 6);
    assert_eq!(sim.state(), RunState::Done);
}

#[tokio::test]
async fn agents_see_all_prior_turns() {
    let sim = build(
        "",
        2,
        vec![AgentConfig::named("A"), AgentConfig::named("B")],
        EchoGenerator,
    )
    .unwrap();
    let records = sim.run_to_end().await.unwrap();

    // The echo stub returns the request block, which embeds the context.
    assert!(records[0].content.contains("Scenario: (none provided)"));
    assert!(records[2].content.contains("[Round 1 - A]"));
    assert!(records[2].content.contains("[Round 1 - B]"));
    assert!(records[3].content.contains("[Round 2 - A]"));
}

/// Echoes like [`EchoGenerator`] and counts how often it was called.
#[derive(Default)]
struct CountingGenerator {
    calls: AtomicUsize,
}

impl TextGenerator for CountingGenerator {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        EchoGenerator.generate(messages).await
    }
}

#[tokio::test]
async fn dropping_the_stream_stops_the_run() {
    let generator = Arc::new(CountingGenerator::default());
    let sim = Simulation::new(
        "s",
        5,
        vec![AgentConfig::named("A"), AgentConfig::named("B")],
        &AgentSettings::default(),
        &prompts(),
        Arc::clone(&generator),
    )
    .unwrap();

    let taken: Vec<SimulationEvent> = sim.into_stream().take(3).collect().await;
    assert_eq!(taken.len(), 3);
    assert!(taken.iter().all(|e| matches!(e, SimulationEvent::Message(_))));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
}

fn prompts_from(system: &str, request: &str) -> (tempfile::TempDir, Arc<PromptEngine>) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("system.j2"), system).unwrap();
    std::fs::write(dir.path().join("request.j2"), request).unwrap();
    let prompts = Arc::new(PromptEngine::from_dir(dir.path()).unwrap());
    (dir, prompts)
}

#[tokio::test]
async fn broken_prompt_template_fails_run_with_error_marker() {
    let (_dir, prompts) = prompts_from("{{ name | no_such_filter }}", "{{ global_context }}");

    let sim = Simulation::new(
        "s",
        2,
        vec![AgentConfig::named("A")],
        &AgentSettings::default(),
        &prompts,
        Arc::new(EchoGenerator),
    )
    .unwrap();

    let events: Vec<SimulationEvent> = sim.into_stream().collect().await;
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], SimulationEvent::Error(msg) if msg.contains("prompt assembly failed")));
}

#[tokio::test]
async fn mid_run_failure_keeps_emitted_turns_and_stops() {
    let (_dir, prompts) = prompts_from(
        "{{ name }}",
        "{% if '[Round 1 - B]' in global_context %}{{ x | no_such_filter }}{% endif %}{{ global_context }}",
    );

    let mut sim = Simulation::new(
        "s",
        3,
        vec![AgentConfig::named("A"), AgentConfig::named("B")],
        &AgentSettings::default(),
        &prompts,
        Arc::new(EchoGenerator),
    )
    .unwrap();

    let mut events = Vec::new();
    while let Some(event) = sim.next_event().await {
        events.push(event);
    }

    assert_eq!(events.len(), 3);
    let speakers: Vec<(u32, String)> = messages(&events)
        .into_iter()
        .map(|record| (record.round, record.speaker))
        .collect();
    assert_eq!(speakers, vec![(1, String::from("A")), (1, String::from("B"))]);
    assert!(matches!(&events[2], SimulationEvent::Error(msg) if msg.contains("prompt assembly failed")));

    assert_eq!(sim.state(), RunState::Failed);
    assert_eq!(sim.next_event().await, None);
    assert_eq!(sim.emitted(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn knowledge_directory_with_broken_file_loads_two_documents() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("brief.txt"), "the pipeline reopens in May").unwrap();
    std::os::unix::fs::symlink(dir.path().join("gone.md"), dir.path().join("lost.md")).unwrap();

    let config = AgentConfig {
        knowledge_mode: KnowledgeMode::Directory,
        knowledge_dir: Some(dir.path().to_string_lossy().into_owned()),
        ..AgentConfig::named("A")
    };

    for _ in 0..2 {
        let sim = build("s", 1, vec![config.clone()], EchoGenerator).unwrap();
        let documents = sim.agents()[0].knowledge().documents();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].content, "the pipeline reopens in May");
        assert!(documents[1].content.contains("knowledge load failed"));
    }
}

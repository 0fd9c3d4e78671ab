use question_randomizer::models::{load_all_surveys, load_survey};
use question_randomizer::orchestrator::drive;
use question_randomizer::services::validate_order;
use question_randomizer::{
    AdvancePolicy, ChaChaSource, HostCall, QuestionRef, RecordingHost, Registry, ScriptedSource,
    Sequencer, SequencerState, ShuffleOptions, Transition, UnitId, UnitSpec,
};

fn implicit_registry(keys: &[&str]) -> (Registry, Vec<UnitId>) {
    let mut registry = Registry::new(false);
    let ids = keys
        .iter()
        .map(|key| {
            registry
                .register(UnitSpec::single(*key, key.to_lowercase(), AdvancePolicy::Implicit))
                .unwrap()
                .unwrap()
        })
        .collect();
    (registry, ids)
}

fn new_sequencer(registry: Registry) -> Sequencer<RecordingHost, ScriptedSource> {
    Sequencer::new(
        registry,
        RecordingHost::new(),
        ScriptedSource::first(),
        ShuffleOptions::default(),
    )
}

#[test]
fn test_implicit_units_advance_on_answer() {
    let (registry, ids) = implicit_registry(&["A", "B", "C"]);
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    let mut seq = new_sequencer(registry);
    seq.use_order(vec![a, b, c]).unwrap();

    assert_eq!(seq.start(), Transition::Advanced { cursor: 1 });
    assert_eq!(seq.host().visible_units(), &[a]);

    assert_eq!(seq.member_answered(a, 0), Transition::Advanced { cursor: 2 });
    assert!(seq.host().contains(&HostCall::Hide(a)));
    assert_eq!(seq.host().visible_units(), &[b]);
    assert_eq!(seq.cursor(), 2);

    assert_eq!(seq.member_answered(b, 0), Transition::Completed);
    assert_eq!(seq.host().visible_units(), &[c]);
    assert_eq!(seq.state(), SequencerState::Complete);
    assert!(seq
        .host()
        .contains(&HostCall::ShowNextControl(QuestionRef::new("C"))));

    // 最后一个单元的作答只做记录
    assert_eq!(seq.member_answered(c, 0), Transition::Recorded);
    assert_eq!(seq.cursor(), 3);
}

#[test]
fn test_explicit_pair_requires_both_answers() {
    let mut registry = Registry::new(true);
    let pair = registry
        .register(UnitSpec::new(
            "pair",
            "x",
            vec![QuestionRef::new("Q1"), QuestionRef::new("Q2")],
            AdvancePolicy::Explicit,
        ))
        .unwrap()
        .unwrap();
    let next = registry
        .register(UnitSpec::single("Q3", "y", AdvancePolicy::Explicit))
        .unwrap()
        .unwrap();
    let last = registry
        .register(UnitSpec::single("Q4", "x", AdvancePolicy::Explicit))
        .unwrap()
        .unwrap();

    let mut seq = new_sequencer(registry);
    seq.use_order(vec![pair, next, last]).unwrap();
    seq.start();

    assert_eq!(seq.member_answered(pair, 0), Transition::Recorded);
    assert_eq!(seq.advance(), Transition::Ignored);
    assert_eq!(seq.cursor(), 1);
    assert_eq!(seq.host().visible_units(), &[pair]);

    assert_eq!(seq.member_answered(pair, 1), Transition::ControlEnabled);
    assert_eq!(seq.advance(), Transition::Advanced { cursor: 2 });
    assert_eq!(seq.host().visible_units(), &[next]);
}

#[test]
fn test_advance_after_complete_is_noop() {
    let (registry, ids) = implicit_registry(&["A", "B"]);
    let mut seq = new_sequencer(registry);
    seq.use_order(ids.clone()).unwrap();
    seq.start();
    assert_eq!(seq.advance(), Transition::Completed);

    let calls_before = seq.host().calls().len();
    let visible_before = seq.host().visible_units().to_vec();

    assert_eq!(seq.advance(), Transition::Ignored);
    assert_eq!(seq.advance(), Transition::Ignored);
    assert_eq!(seq.state(), SequencerState::Complete);
    assert_eq!(seq.cursor(), 2);
    assert_eq!(seq.host().calls().len(), calls_before);
    assert_eq!(seq.host().visible_units(), visible_before.as_slice());
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let build = || {
        let mut registry = Registry::new(false);
        for (i, group) in ["a", "a", "b", "b", "c", "c", "a", "b"].iter().enumerate() {
            registry
                .add_question(QuestionRef::new(format!("Q{i}")), group, None, None)
                .unwrap();
        }
        Sequencer::new(
            registry,
            RecordingHost::new(),
            ChaChaSource::seeded(2024),
            ShuffleOptions::default(),
        )
    };

    let first = drive(build());
    let second = drive(build());

    assert_eq!(first.state(), SequencerState::Complete);
    assert_eq!(first.order(), second.order());
    assert_eq!(first.host().revealed_order(), first.order().to_vec());

    let groups = first.registry().groups();
    let order: Vec<usize> = first.order().iter().map(|id| id.index()).collect();
    assert!(validate_order(&groups, &order, 2));
}

#[test]
fn test_load_survey_file_and_run() {
    let dir = std::env::temp_dir().join(format!("question_randomizer_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("survey.toml");
    std::fs::write(
        &path,
        r#"
[[questions]]
id = "Q1"
group = "a"
block = "first"

[[questions]]
id = "Q2"
group = "a"
block = "first"

[[questions]]
id = "Q3"
group = "b"
"#,
    )
    .unwrap();
    std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let survey = tokio_test::block_on(load_survey(&path)).unwrap();
    assert_eq!(survey.questions.len(), 3);

    let all = tokio_test::block_on(load_all_surveys(dir.to_str().unwrap())).unwrap();
    assert_eq!(all.len(), 1);

    let registry = survey.build_registry(true).unwrap();
    let seq = drive(Sequencer::new(
        registry,
        RecordingHost::new(),
        ChaChaSource::seeded(1),
        ShuffleOptions::default(),
    ));
    assert_eq!(seq.state(), SequencerState::Complete);
    assert_eq!(seq.host().revealed_order().len(), 2);

    std::fs::remove_dir_all(&dir).unwrap();
}

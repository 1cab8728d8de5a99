//! Text Annotation Integration Tests
//!
//! Exercises the text service against caller-owned collections:
//! - Creation defaults and overrides
//! - Identifier uniqueness across services sharing a sequence
//! - Update, delete and clear semantics on hits and misses

use composer_core::{IdSequence, RecordId, Scene, TextDefaults, TextService};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_move_text_keeps_content() {
    init_tracing();
    let service = TextService::new();
    let mut scene = Scene::default();
    scene
        .texts
        .push(service.create_text(None, Some("Headline".to_string())));

    let id = RecordId::from("text-1");
    assert!(service.update_text_position(&id, 50.0, 75.0, &mut scene.texts));

    let text = service.find_text(&id, &scene.texts).expect("text-1");
    assert!((text.x - 50.0).abs() < f32::EPSILON);
    assert!((text.y - 75.0).abs() < f32::EPSILON);
    assert_eq!(text.content, "Headline");
}

#[test]
fn test_shared_sequence_across_services() {
    let sequence = IdSequence::new();
    let left = TextService::with_sequence(sequence.clone(), TextDefaults::default());
    let right = TextService::with_sequence(sequence.clone(), TextDefaults::default());

    let ids: Vec<_> = (0..4)
        .map(|n| {
            if n % 2 == 0 {
                left.create_default_text().id
            } else {
                right.create_default_text().id
            }
        })
        .collect();

    assert_eq!(ids, ["text-1", "text-2", "text-3", "text-4"]);
    assert_eq!(sequence.current(), 4);
}

#[test]
fn test_injected_sequence_is_deterministic() {
    let service = TextService::with_sequence(IdSequence::starting_at(100), TextDefaults::default());
    assert_eq!(service.create_default_text().id, "text-100");
    assert_eq!(service.create_default_text().id, "text-101");
}

#[test]
fn test_custom_defaults() {
    let defaults = TextDefaults {
        x: 10.0,
        y: 20.0,
        content: "Label".to_string(),
        font_size: 12.0,
        font_family: "Helvetica".to_string(),
        color: "#ff0000".to_string(),
    };
    let service = TextService::with_sequence(IdSequence::new(), defaults);
    let text = service.create_default_text();

    assert_eq!(text.content, "Label");
    assert_eq!(text.font_family, "Helvetica");
    assert_eq!(text.color, "#ff0000");
    assert!((text.font_size - 12.0).abs() < f32::EPSILON);
    assert!((text.x - 10.0).abs() < f32::EPSILON);
}

#[test]
fn test_delete_missing_leaves_collection_untouched() {
    let service = TextService::new();
    let mut texts = vec![service.create_default_text(), service.create_default_text()];
    let before = texts.clone();

    assert!(!service.delete_text(&"text-7".into(), &mut texts));
    assert_eq!(texts, before);
}

#[test]
fn test_delete_removes_exactly_one() {
    let service = TextService::new();
    let mut texts: Vec<_> = (0..3).map(|_| service.create_default_text()).collect();

    assert!(service.delete_text(&"text-2".into(), &mut texts));

    let ids: Vec<_> = texts.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["text-1", "text-3"]);
}

#[test]
fn test_clear_any_size() {
    let service = TextService::new();
    for size in [0, 1, 25] {
        let mut texts: Vec<_> = (0..size).map(|_| service.create_default_text()).collect();
        service.clear_texts(&mut texts);
        assert!(texts.is_empty());
    }
}

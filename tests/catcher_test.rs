use replay_synth::*;

fn difficulty() -> BeatmapDifficulty {
    BeatmapDifficulty::default()
}

fn fruit(id: usize, time: f64, x: f32) -> PalpableCatchHitObject {
    PalpableCatchHitObject::fruit(id, time, x)
}

fn sample_map() -> Vec<CatchHitObject> {
    vec![
        CatchHitObject::Palpable(fruit(0, 500.0, 256.0)),
        CatchHitObject::Palpable(fruit(1, 1000.0, 100.0)),
        CatchHitObject::Palpable(fruit(2, 1300.0, 400.0)),
        CatchHitObject::JuiceStream {
            start_time: 1500.0,
            nested: vec![
                PalpableCatchHitObject::new(3, PalpableKind::Droplet, 1500.0, 420.0),
                PalpableCatchHitObject::new(4, PalpableKind::TinyDroplet, 1550.0, 380.0),
                PalpableCatchHitObject::new(5, PalpableKind::Droplet, 1600.0, 350.0)
                    .with_last_in_combo(),
            ],
        },
        CatchHitObject::BananaShower {
            start_time: 2000.0,
            end_time: 2200.0,
            bananas: vec![
                PalpableCatchHitObject::new(6, PalpableKind::Banana, 2000.0, 100.0),
                PalpableCatchHitObject::new(7, PalpableKind::Banana, 2200.0, 300.0),
            ],
        },
    ]
}

#[test]
fn test_catch_width_is_deterministic() {
    let first = Catcher::new(&difficulty(), 1);
    let mut second = Catcher::new(&difficulty(), 2);
    assert_eq!(first.catch_width(), second.catch_width());

    second.update_position(10.0);
    assert!(second.scale().x < 0.0);
    assert_eq!(first.catch_width(), second.catch_width());
    assert_eq!(
        first.catch_width(),
        catch_width_for_difficulty(&difficulty())
    );
}

#[test]
fn test_catch_range_edges() {
    assert!(catch_range_contains(100.0, 1.0, 100.5));
    assert!(!catch_range_contains(100.0, 1.0, 101.5));
}

#[test]
fn test_hyper_dash_stops_exactly_on_target() {
    let mut catcher = Catcher::new(&difficulty(), 0);
    catcher.set_dashing(true);
    catcher.set_hyper_dash_state(2.0, 400.0);

    let mut updates = 0;
    while catcher.hyper_dashing() {
        catcher.update(16.0, 1);
        updates += 1;
        assert!(updates < 10, "hyper-dash never ended");
    }
    assert_eq!(catcher.x(), 400.0);
    assert_eq!(updates, 5);
    assert_eq!(
        catcher.take_events(),
        vec![
            CatcherEvent::HyperDashStarted { direction: 1 },
            CatcherEvent::HyperDashEnded
        ]
    );
}

#[test]
fn test_revert_restores_catcher_and_plate() {
    let mut area = CatcherArea::new(&difficulty(), 11);
    let mut first = CatchJudgementResult::new(fruit(0, 0.0, 256.0), true, 0.0);
    area.on_new_result(&mut first);

    let stacked_before = area.catcher().stack().stacked().to_vec();
    let dropped_before = area.catcher().stack().dropped().to_vec();
    let state_before = area.catcher().current_state();
    let hyper_dash_before = area.catcher().hyper_dash();

    let object = fruit(1, 100.0, 256.0)
        .with_hyper_dash_target(&fruit(2, 300.0, 500.0))
        .with_last_in_combo();
    let mut second = CatchJudgementResult::new(object, true, 100.0);
    area.on_new_result(&mut second);
    assert!(area.catcher().hyper_dashing());
    assert!(area.catcher().stack().stacked().is_empty());
    assert_eq!(area.catcher().stack().dropped().len(), 2);

    area.on_revert_result(&second);
    assert_eq!(area.catcher().stack().stacked(), stacked_before.as_slice());
    assert_eq!(area.catcher().stack().dropped(), dropped_before.as_slice());
    assert_eq!(area.catcher().current_state(), state_before);
    assert_eq!(area.catcher().hyper_dash(), hyper_dash_before);
    assert_eq!(
        area.catcher_mut().take_events(),
        vec![
            CatcherEvent::HyperDashStarted { direction: 1 },
            CatcherEvent::HyperDashEnded
        ]
    );
}

#[test]
fn test_revert_of_miss_restores_state() {
    let mut catcher = Catcher::new(&difficulty(), 0);
    let mut miss = CatchJudgementResult::new(fruit(0, 0.0, 0.0), false, 0.0);
    catcher.on_new_result(&mut miss);
    assert_eq!(catcher.current_state(), CatcherAnimationState::Fail);

    catcher.on_revert_result(&miss);
    assert_eq!(catcher.current_state(), CatcherAnimationState::Idle);
}

#[test]
fn test_crowded_plate_still_stacks() {
    let mut catcher = Catcher::new(&difficulty(), 5);
    for id in 0..300 {
        let mut result = CatchJudgementResult::new(fruit(id, id as f64, 256.0), true, id as f64);
        catcher.on_new_result(&mut result);
    }
    assert_eq!(catcher.stack().stacked().len(), 300);
}

#[test]
fn test_exploded_objects_expire() {
    let mut area = CatcherArea::new(&difficulty(), 0);
    let mut result = CatchJudgementResult::new(fruit(0, 0.0, 256.0).with_last_in_combo(), true, 0.0);
    area.on_new_result(&mut result);
    assert_eq!(area.catcher().stack().dropped().len(), 1);

    let entry = &area.catcher().stack().dropped()[0];
    let peak = entry
        .dropped_position_at(EXPLODE_RISE_DURATION)
        .expect("Dropped entry has a transform");
    assert_eq!(peak.y, entry.position_in_stack.y - EXPLODE_HEIGHT);

    area.advance_to(2000.0);
    assert!(area.catcher().stack().dropped().is_empty());
}

#[test]
fn test_auto_replay_catches_everything() {
    let objects = sample_map();
    let frames = CatchAutoGenerator::new(&difficulty(), &objects).generate();
    for pair in frames.windows(2) {
        assert!(pair[0].time < pair[1].time, "{:?}", pair);
    }

    let mut processor = CatchProcessor::new(&difficulty(), &objects, 7);
    let mut judged = Vec::new();
    processor
        .process(
            &frames,
            &mut |_: &CatcherArea, result: &CatchJudgementResult| -> ReplaySynthResult<()> {
                judged.push(result.object.id);
                Ok(())
            },
        )
        .expect("Failed to process catch replay");

    assert_eq!(judged, (0..8).collect::<Vec<_>>());
    assert_eq!(processor.hit_count(), 8);
    assert_eq!(processor.miss_count(), 0);
}

#[test]
fn test_standing_still_misses_far_objects() {
    let objects = sample_map();
    let frames = vec![CatchReplayFrame::new(0.0, 256.0, false)];
    let mut processor = CatchProcessor::new(&difficulty(), &objects, 7);
    let mut ignore = |_: &CatcherArea, _: &CatchJudgementResult| -> ReplaySynthResult<()> { Ok(()) };
    processor
        .process(&frames, &mut ignore)
        .expect("Failed to process catch replay");

    let hits: Vec<_> = processor
        .results()
        .iter()
        .filter(|result| result.is_hit)
        .map(|result| result.object.id)
        .collect();
    assert_eq!(hits, vec![0]);
}

#[test]
fn test_revert_to_and_replay_again() {
    let objects = sample_map();
    let frames = CatchAutoGenerator::new(&difficulty(), &objects).generate();
    let mut processor = CatchProcessor::new(&difficulty(), &objects, 7);
    let mut ignore = |_: &CatcherArea, _: &CatchJudgementResult| -> ReplaySynthResult<()> { Ok(()) };
    processor
        .process(&frames, &mut ignore)
        .expect("Failed to process catch replay");

    processor.revert_to(1500.0);
    assert_eq!(processor.results().len(), 3);
    assert_eq!(processor.area().catcher().stack().stacked().len(), 3);
    assert!(processor.area().catcher().stack().dropped().is_empty());

    processor
        .process(&frames, &mut ignore)
        .expect("Failed to process catch replay");
    assert_eq!(processor.results().len(), 8);
    assert_eq!(processor.miss_count(), 0);
}

#[test]
fn test_collector_can_stop_early() {
    let objects = sample_map();
    let frames = CatchAutoGenerator::new(&difficulty(), &objects).generate();
    let mut processor = CatchProcessor::new(&difficulty(), &objects, 7);
    let mut seen = 0;
    processor
        .process(
            &frames,
            &mut |_: &CatcherArea, _: &CatchJudgementResult| -> ReplaySynthResult<()> {
                seen += 1;
                if seen == 2 {
                    return ReplaySynthError::new_result(
                        ReplaySynthErrorVariant::FinishProcessingEarly,
                    );
                }
                Ok(())
            },
        )
        .expect("Stopping early is not an error");
    assert_eq!(processor.results().len(), 2);
}

#[test]
fn test_bad_frames_are_rejected() {
    let objects = sample_map();
    let mut processor = CatchProcessor::new(&difficulty(), &objects, 7);
    let mut ignore = |_: &CatcherArea, _: &CatchJudgementResult| -> ReplaySynthResult<()> { Ok(()) };

    let err = processor
        .process(&[], &mut ignore)
        .expect_err("Empty replay should be rejected");
    assert_eq!(err.variant, ReplaySynthErrorVariant::NoReplayFrames);

    let unordered = vec![
        CatchReplayFrame::new(0.0, 256.0, false),
        CatchReplayFrame::new(100.0, 256.0, false),
        CatchReplayFrame::new(50.0, 256.0, false),
    ];
    let err = processor
        .process(&unordered, &mut ignore)
        .expect_err("Unordered replay should be rejected");
    assert_eq!(
        err.variant,
        ReplaySynthErrorVariant::UnorderedReplayFrames { index: 2 }
    );
    assert!(processor.results().is_empty());
}

#[test]
fn test_catch_objects_from_json() {
    let json = r#"[
        {"type": "Palpable", "id": 0, "kind": "Fruit", "start_time": 100.0, "original_x": 256.0},
        {"type": "JuiceStream", "start_time": 300.0, "nested": [
            {"id": 1, "kind": "Droplet", "start_time": 300.0, "original_x": 280.0, "last_in_combo": true}
        ]}
    ]"#;
    let objects: Vec<CatchHitObject> = serde_json::from_str(json).expect("Failed to parse objects");
    let flat = flatten_palpable(&objects);
    assert_eq!(flat.len(), 2);
    assert!(flat[1].last_in_combo);
}

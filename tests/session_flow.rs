use gridpage::{
    EventFlow, FormatCommand, FormatOutcome, Gesture, LayoutEngine, Logger, MarkupRenderer,
    PageSession, PointerGesture, RecordingFacility, SectionId, SessionConfig, SessionEvent,
    StaticEditor, Wizard, WizardStep, logging::MemorySink,
};

fn session() -> PageSession {
    PageSession::new(SessionConfig::default()).expect("session")
}

/// Deterministic xorshift so the sweep is reproducible without extra deps.
struct Xorshift(u64);

impl Xorshift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound.max(1)
    }
}

fn assert_consistent(session: &PageSession) {
    let columns = session.active_breakpoint().columns;
    let layout = session.active_layout().expect("active layout");

    assert!(layout.is_overlap_free(), "overlap in {layout:?}");
    assert!(layout.fits(columns), "layout exceeds {columns} columns");
    assert_eq!(
        &LayoutEngine::resolve(layout, columns, None),
        layout,
        "resolved layout is not a fixpoint"
    );

    for name in session.layouts().names() {
        assert_eq!(session.layouts().get(name).unwrap().len(), session.store().len());
    }
    for section in session.sections() {
        let item = layout.get(section.id).expect("section missing from layout");
        assert_eq!(section.rect(), item.rect());
    }
}

#[test]
fn add_two_sections_then_remove_first() {
    let mut session = session();
    let intro = session.add_section("Intro").unwrap().unwrap();
    let body = session.add_section("Body").unwrap().unwrap();

    let names: Vec<String> = session.sections().into_iter().map(|s| s.name).collect();
    assert_eq!(names, ["Intro", "Body"]);
    assert_eq!(session.store().get(body).unwrap().y, 8);

    session.remove_section(intro).unwrap();
    let remaining = session.sections();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, body);
    assert_eq!(remaining[0].y, 0);
    assert_consistent(&session);
}

#[test]
fn ids_are_unique_even_after_clear() {
    let mut session = session();
    let first = session.add_section("A").unwrap().unwrap();
    session.clear_sections().unwrap();
    let second = session.add_section("A").unwrap().unwrap();

    assert_ne!(first, second);
    assert_eq!(session.sections().len(), 1);
    assert_consistent(&session);
}

#[test]
fn random_gesture_sweep_keeps_invariants() {
    let mut rng = Xorshift(0x9E37_79B9_7F4A_7C15);
    let mut session = session();
    let mut ids: Vec<SectionId> = Vec::new();
    let widths = [1300, 1000, 800, 500, 200];

    for step in 0..400 {
        match rng.below(11) {
            0 | 1 => {
                if let Some(id) = session.add_section(&format!("S{step}")).unwrap() {
                    ids.push(id);
                }
            }
            9 => {
                let blank = ["", "  ", "\t\n"][rng.below(3) as usize];
                assert!(session.add_section(blank).unwrap().is_none());
            }
            2 if !ids.is_empty() => {
                let id = ids.remove(rng.below(ids.len() as u64) as usize);
                assert!(session.remove_section(id).unwrap());
            }
            3 => {
                let width = widths[rng.below(widths.len() as u64) as usize];
                session.resize(width).unwrap();
            }
            4 | 5 | 6 if !ids.is_empty() => {
                let id = ids[rng.below(ids.len() as u64) as usize];
                session
                    .apply_gesture(Gesture::Drag {
                        id,
                        x: rng.below(30) as u16,
                        y: rng.below(40) as u16,
                    })
                    .unwrap();
            }
            7 | 8 if !ids.is_empty() => {
                let id = ids[rng.below(ids.len() as u64) as usize];
                session
                    .apply_gesture(Gesture::Resize {
                        id,
                        w: rng.below(30) as u16,
                        h: rng.below(12) as u16,
                    })
                    .unwrap();
            }
            _ => {}
        }
        assert_eq!(session.store().len(), ids.len());
        assert_consistent(&session);
    }
}

#[test]
fn geometry_changes_preserve_content() {
    let mut session = session();
    let a = session.add_section("A").unwrap().unwrap();
    let b = session.add_section("B").unwrap().unwrap();
    session.update_content(a, "<p>alpha</p>".into());
    session.update_content(b, "<h1>beta</h1>".into());

    session.apply_gesture(Gesture::Drag { id: b, x: 0, y: 0 }).unwrap();
    session.apply_gesture(Gesture::Resize { id: a, w: 12, h: 4 }).unwrap();
    session.resize(400).unwrap();

    assert_eq!(session.store().get(a).unwrap().content, "<p>alpha</p>");
    assert_eq!(session.store().get(b).unwrap().content, "<h1>beta</h1>");
    assert_consistent(&session);
}

#[test]
fn resize_below_minimum_is_clamped() {
    let mut session = session();
    let a = session.add_section("A").unwrap().unwrap();
    session.apply_gesture(Gesture::Resize { id: a, w: 0, h: 0 }).unwrap();

    let section = session.store().get(a).unwrap();
    assert_eq!((section.w, section.h), (1, 2));
}

#[test]
fn pointer_drag_snaps_to_cells() {
    let mut session = session();
    let a = session.add_section("A").unwrap().unwrap();

    // 1200px over 24 columns with 5px margins and padding: ~44.8px per column.
    session
        .apply_pointer(PointerGesture::Drag {
            id: a,
            left: 505,
            top: 5,
        })
        .unwrap()
        .unwrap();

    let section = session.store().get(a).unwrap();
    assert_eq!((section.x, section.y), (10, 0));
    assert_consistent(&session);
}

#[test]
fn toolbar_commands_follow_focus() {
    let facility = RecordingFacility::new();
    let mut session = session().with_command_facility(facility.clone());
    let a = session.add_section("A").unwrap().unwrap();
    let b = session.add_section("B").unwrap().unwrap();

    assert_eq!(
        session.dispatch(SessionEvent::Format(FormatCommand::Bold)).unwrap(),
        EventFlow::Ignored
    );

    session.dispatch(SessionEvent::Focus { id: a }).unwrap();
    session
        .dispatch(SessionEvent::Blur {
            id: a,
            content: "<p>a</p>".into(),
        })
        .unwrap();
    session.dispatch(SessionEvent::Focus { id: b }).unwrap();

    let outcome = session.apply_formatting(&FormatCommand::parse("formatBlock", Some("h2")));
    assert_eq!(outcome, FormatOutcome::Forwarded { target: b });
    assert_eq!(
        facility.calls(),
        vec![("formatBlock".to_string(), Some("h2".to_string()))]
    );
}

#[test]
fn render_emits_placed_markup() {
    let mut session = session();
    let a = session.add_section("Intro").unwrap().unwrap();
    session.update_content(a, "<p>hello</p>".into());

    let mut widget = MarkupRenderer::with_default(Vec::new());
    assert_eq!(session.render(&mut widget).unwrap(), 1);

    let html = String::from_utf8(widget.into_inner()).unwrap();
    assert!(html.contains("data-grid=\"0,0,6,8\""));
    assert!(html.contains("data-placeholder=\"Enter content for Intro...\""));
    assert!(html.contains("<p>hello</p></section>"));
}

#[test]
fn json_config_drives_session() {
    let sink = MemorySink::new();
    let config = SessionConfig::from_json(
        r#"{
            "breakpoints": [
                {"name": "wide", "min_width": 800, "columns": 6},
                {"name": "narrow", "min_width": 0, "columns": 2}
            ],
            "section_defaults": {"w": 4, "h": 3},
            "initial_width": 1000
        }"#,
    )
    .unwrap()
    .with_logger(Logger::new(sink.clone()));

    let mut session = PageSession::new(config).unwrap();
    session
        .run_scripted([
            SessionEvent::AddSection { name: "A".into() },
            SessionEvent::AddSection { name: "B".into() },
            SessionEvent::Resize { width: 300 },
        ])
        .unwrap();

    assert_eq!(session.active_breakpoint().name, "narrow");
    for section in session.sections() {
        assert_eq!(section.w, 2);
        assert_eq!(section.h, 3);
    }
    assert_consistent(&session);
    assert!(sink.messages().iter().any(|m| m == "breakpoint_changed"));
}

#[test]
fn wizard_with_invalid_count_builds_single_section() {
    let mut wizard = Wizard::from_config(&SessionConfig::default());
    let mut editor = StaticEditor::new();

    wizard.start();
    assert_eq!(wizard.set_count("abc").unwrap(), 1);
    assert_eq!(
        wizard.submit_count().unwrap(),
        WizardStep::GridPrompt { index: 0, total: 1 }
    );
    wizard.set_rows("2").unwrap();
    wizard.set_cols("-4").unwrap();
    assert_eq!(
        wizard.submit_grid(&mut editor).unwrap(),
        WizardStep::Finished { sections: 1 }
    );

    let html = editor.value();
    assert_eq!(html.matches("class=\"main-section\"").count(), 1);
    assert!(html.contains("grid-template-rows: repeat(2, 1fr)"));
    assert!(html.contains("grid-template-columns: repeat(1, 1fr)"));
    assert!(html.contains("<p>Section 1.2</p>"));
    assert!(!wizard.is_active());
}

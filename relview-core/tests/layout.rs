
use relview_core::host::mock::HostCall;
use relview_core::{
    ActivationMode, SearchMode, SessionEvent, SessionMessage, SettingsManager, ViewColumn,
};

#[test]
fn single_visible_editor_falls_back_to_column_two() {
    fixture::run(|mut fixture| async move {
        fixture
            .step(SessionMessage::OpenRelatedFiles {
                document: Some(fixture.path("src/Button.tsx")),
            })
            .await;

        // Move the pane away from the fallback first.
        fixture.host.set_groups(vec![
            fixture::tab_group(1, vec![fixture.path("src/main.ts")]),
            fixture::tab_group(
                3,
                vec![
                    fixture.marker.clone(),
                    fixture.path("src/Button.css"),
                    fixture.path("src/Button.test.tsx"),
                ],
            ),
        ]);
        let events = fixture.step(SessionMessage::ViewColumnChanged).await;
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::PaneChanged { column: Some(ViewColumn(3)) }
        )));

        // With a single visible editor there is nothing to classify.
        fixture.host.set_visible_editors(Some(1));
        let events = fixture.step(SessionMessage::ViewColumnChanged).await;
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::PaneChanged { column: Some(ViewColumn::TWO) }
        )));
    });
}

#[test]
fn column_change_recomputes_once_more_after_the_groups_settle() {
    fixture::run(|mut fixture| async move {
        fixture
            .step(SessionMessage::OpenRelatedFiles {
                document: Some(fixture.path("src/Button.tsx")),
            })
            .await;

        // The column-change notification arrives while the layout still
        // reports the old shape; this arms the follow-up.
        let events = fixture.step(SessionMessage::ViewColumnChanged).await;
        assert!(events.is_empty());

        let pane_tabs = vec![
            fixture.marker.clone(),
            fixture.path("src/Button.css"),
            fixture.path("src/Button.test.tsx"),
        ];
        fixture.host.set_groups(vec![
            fixture::tab_group(1, vec![fixture.path("src/main.ts")]),
            fixture::tab_group(4, pane_tabs.clone()),
        ]);
        let events = fixture.step(SessionMessage::TabGroupsChanged).await;
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::PaneChanged { column: Some(ViewColumn(4)) }
        )));

        // The follow-up is one-shot; further group churn is ignored.
        fixture.host.set_groups(vec![
            fixture::tab_group(1, vec![fixture.path("src/main.ts")]),
            fixture::tab_group(5, pane_tabs),
        ]);
        let events = fixture.step(SessionMessage::TabGroupsChanged).await;
        assert!(events.is_empty());
    });
}

#[test]
fn startup_adopts_a_marker_left_open_by_a_previous_session() {
    fixture::run_with(
        |_| {},
        |host, workspace| {
            host.set_groups(vec![
                fixture::tab_group(1, vec![workspace.join("src/main.ts")]),
                fixture::tab_group(3, vec![workspace.join(".relview/Related Files View")]),
            ]);
        },
        |fixture| async move {
            assert!(fixture.startup_events.iter().any(|e| matches!(
                e,
                SessionEvent::PaneChanged { column: Some(ViewColumn(3)) }
            )));
        },
    );
}

#[test]
fn startup_without_a_marker_seeds_the_next_free_column() {
    fixture::run(|fixture| async move {
        assert!(fixture.startup_events.iter().any(|e| matches!(
            e,
            SessionEvent::PaneChanged { column: Some(ViewColumn::TWO) }
        )));
    });
}

#[test]
fn initialised_notice_do_not_show_again_persists() {
    fixture::run_with(
        |settings| settings.show_initialised = true,
        |host, _| host.push_info_answer(Some("Do Not Show Again")),
        |fixture| async move {
            assert!(!fixture.settings.settings().show_initialised);

            // Persisted, not just in memory.
            eprintln!("PATH: {:?} exists={}", fixture.settings.path(), fixture.settings.path().exists());
            let root = fixture.workspace_dir.path();
            for entry in walkdir(root) { eprintln!("TREE: {:?}", entry); }
            fn walkdir(p: &std::path::Path) -> Vec<std::path::PathBuf> {
                let mut out = vec![];
                if let Ok(rd) = std::fs::read_dir(p) {
                    for e in rd.flatten() {
                        out.push(e.path());
                        if e.path().is_dir() { out.extend(walkdir(&e.path())); }
                    }
                }
                out
            }
            let reloaded = SettingsManager::from_path(fixture.settings.path().to_path_buf())
                .unwrap()
                .settings();
            assert!(!reloaded.show_initialised);
        },
    );
}

#[test]
fn initialised_notice_dismissed_keeps_the_setting() {
    fixture::run_with(
        |settings| settings.show_initialised = true,
        |host, _| host.push_info_answer(None),
        |fixture| async move {
            assert!(fixture.settings.settings().show_initialised);
        },
    );
}

#[test]
fn activation_mode_change_offers_a_restart() {
    fixture::run(|mut fixture| async move {
        std::fs::write(fixture.settings.path(), "activation_mode = \"manual\"\n").unwrap();
        fixture.host.push_warning_answer(Some("Restart Now"));

        fixture
            .step(SessionMessage::ConfigurationChanged {
                affected: vec!["activation_mode".to_string()],
            })
            .await;

        assert_eq!(
            fixture.settings.settings().activation_mode,
            ActivationMode::Manual
        );
        assert!(fixture
            .host
            .calls()
            .contains(&HostCall::Command("workbench.action.reloadWindow".to_string())));
    });
}

#[test]
fn other_setting_changes_reload_without_a_restart() {
    fixture::run(|mut fixture| async move {
        std::fs::write(fixture.settings.path(), "search_mode = \"root\"\n").unwrap();
        fixture.host.clear_calls();

        fixture
            .step(SessionMessage::ConfigurationChanged {
                affected: vec!["search_mode".to_string()],
            })
            .await;

        assert_eq!(fixture.settings.settings().search_mode, SearchMode::Root);
        assert!(!fixture
            .host
            .calls()
            .iter()
            .any(|c| matches!(c, HostCall::Command(_))));
    });
}

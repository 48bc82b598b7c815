use chrono::NaiveDate;
use crewboard::db::Database;
use crewboard::error::Error;
use crewboard::manager::TaskManager;
use crewboard::models::*;
use speculate2::speculate;

fn setup() -> (Database, TaskManager) {
    let db = Database::open_memory().expect("Failed to create in-memory database");
    db.migrate().expect("Failed to run migrations");
    let manager = TaskManager::new(db.clone());
    (db, manager)
}

fn create_test_member(db: &Database) -> Member {
    let board = db
        .create_board(CreateBoardInput {
            name: "Sprint Board".to_string(),
        })
        .expect("Failed to create board");

    db.create_member(
        board.id,
        CreateMemberInput {
            name: "John Doe".to_string(),
            avatar: None,
        },
    )
    .expect("Failed to create member")
}

fn full_patch(member_id: i64) -> TaskPatch {
    TaskPatch {
        name: Some("Some task name".to_string()),
        date: Some("2015-01-07".to_string()),
        estimate: Some(2.0),
        consumed: Some(1.0),
        remaining: Some(1.5),
        member: Some(member_id),
    }
}

speculate! {
    before {
        let (db, manager) = setup();
        let member = create_test_member(&db);
    }

    describe "hydrate" {
        it "fills a fresh task from a full patch" {
            let task = manager.hydrate(TaskDraft::default(), &full_patch(member.id))
                .expect("Hydration failed");

            assert_eq!(task.name, "Some task name");
            assert_eq!(task.date.to_string(), "2015-01-07");
            assert_eq!(task.member_id, member.id);
            assert_eq!(task.estimate, 2.0);
            assert_eq!(task.consumed, 1.0);
            assert_eq!(task.remaining, 1.5);
        }

        it "changes only the fields present in the patch" {
            let task = manager.create(&full_patch(member.id)).expect("Create failed");

            let patch = TaskPatch {
                consumed: Some(1.25),
                ..TaskPatch::default()
            };
            let updated = manager.hydrate(task.into(), &patch).expect("Hydration failed");

            assert_eq!(updated.name, "Some task name");
            assert_eq!(updated.estimate, 2.0);
            assert_eq!(updated.remaining, 1.5);
            assert_eq!(updated.consumed, 1.25);
        }

        it "fails with NotFound for an unknown member id" {
            let mut patch = full_patch(member.id);
            patch.member = Some(9999);

            let result = manager.hydrate(TaskDraft::default(), &patch);

            assert!(matches!(result, Err(Error::NotFound { .. })));
        }

        it "accumulates every violation instead of stopping at the first" {
            let patch = TaskPatch {
                date: Some("not-a-date".to_string()),
                estimate: Some(-1.0),
                ..TaskPatch::default()
            };

            let Err(Error::Validation(violations)) =
                manager.hydrate(TaskDraft::default(), &patch)
            else {
                panic!("Expected a validation error");
            };

            // Bad date, negative estimate, and the three completeness rules.
            assert_eq!(violations.len(), 5);
            assert!(violations.iter().any(|v| v.contains("not-a-date")));
            assert!(violations.iter().any(|v| v.contains("Estimate")));
            assert!(violations.iter().any(|v| v.contains("Member")));
        }

        it "accepts zero hours" {
            let mut patch = full_patch(member.id);
            patch.estimate = Some(0.0);

            let task = manager.hydrate(TaskDraft::default(), &patch)
                .expect("Hydration failed");

            assert_eq!(task.estimate, 0.0);
        }

        it "persists nothing" {
            manager.hydrate(TaskDraft::default(), &full_patch(member.id))
                .expect("Hydration failed");

            let tasks = db.get_tasks_by_member(member.id, None).expect("Query failed");
            assert!(tasks.is_empty());
        }
    }

    describe "update" {
        it "round-trips the date through the patch" {
            let task = manager.create(&full_patch(member.id)).expect("Create failed");

            let patch = TaskPatch {
                date: Some("2015-01-08".to_string()),
                ..TaskPatch::default()
            };
            let updated = manager.update(task.id.unwrap(), &patch).expect("Update failed");

            assert_eq!(updated.date.to_string(), "2015-01-08");

            let stored = db.get_task(task.id.unwrap()).expect("Query failed")
                .expect("Task missing");
            assert_eq!(stored.date.to_string(), "2015-01-08");
        }

        it "leaves the stored task untouched when validation fails" {
            let task = manager.create(&full_patch(member.id)).expect("Create failed");

            let patch = TaskPatch {
                remaining: Some(-0.5),
                ..TaskPatch::default()
            };
            let result = manager.update(task.id.unwrap(), &patch);
            assert!(matches!(result, Err(Error::Validation(_))));

            let stored = db.get_task(task.id.unwrap()).expect("Query failed")
                .expect("Task missing");
            assert_eq!(stored.remaining, 1.5);
        }
    }

    describe "split" {
        it "halves the original and gives the sibling the other half" {
            let mut task = manager.create(&full_patch(member.id)).expect("Create failed");

            let sibling = manager.split(&mut task).expect("Split failed");

            assert_eq!(task.estimate, 1.0);
            assert_eq!(task.consumed, 0.5);
            assert_eq!(task.remaining, 0.75);
            assert_eq!(sibling.estimate, 1.0);
            assert_eq!(sibling.consumed, 0.5);
            assert_eq!(sibling.remaining, 0.75);
        }

        it "copies name, member and date onto the sibling" {
            let mut task = manager.create(&full_patch(member.id)).expect("Create failed");

            let sibling = manager.split(&mut task).expect("Split failed");

            assert_eq!(sibling.name, task.name);
            assert_eq!(sibling.member_id, task.member_id);
            assert_eq!(sibling.date, task.date);
            assert!(sibling.id.is_some());
            assert_ne!(sibling.id, task.id);
        }

        it "persists both halves" {
            let mut task = manager.create(&full_patch(member.id)).expect("Create failed");

            manager.split(&mut task).expect("Split failed");

            let tasks = db.get_tasks_by_member(member.id, None).expect("Query failed");
            assert_eq!(tasks.len(), 2);
            let total: f64 = tasks.iter().map(|t| t.estimate).sum();
            assert_eq!(total, 2.0);
        }

        it "rejects an unsaved task" {
            let mut task = manager.hydrate(TaskDraft::default(), &full_patch(member.id))
                .expect("Hydration failed");

            let result = manager.split(&mut task);

            assert!(matches!(result, Err(Error::Validation(_))));
        }
    }

    describe "merge" {
        it "sums the hour fields into the target and deletes the source" {
            let source = manager.create(&full_patch(member.id)).expect("Create failed");
            let mut target = manager.create(&TaskPatch {
                name: Some("Target".to_string()),
                estimate: Some(3.0),
                consumed: Some(2.0),
                remaining: Some(0.5),
                ..full_patch(member.id)
            }).expect("Create failed");

            manager.merge(&source, &mut target).expect("Merge failed");

            assert_eq!(target.estimate, 5.0);
            assert_eq!(target.consumed, 3.0);
            assert_eq!(target.remaining, 2.0);
            assert_eq!(target.name, "Target");

            assert!(db.get_task(source.id.unwrap()).expect("Query failed").is_none());
            let stored = db.get_task(target.id.unwrap()).expect("Query failed")
                .expect("Task missing");
            assert_eq!(stored.estimate, 5.0);
        }

        it "rejects a source that has never been saved" {
            let source = manager.hydrate(TaskDraft::default(), &full_patch(member.id))
                .expect("Hydration failed");
            let mut target = manager.create(&full_patch(member.id)).expect("Create failed");

            let result = manager.merge(&source, &mut target);
            assert!(matches!(result, Err(Error::Validation(_))));

            // Nothing was persisted for the failed merge.
            let stored = db.get_task(target.id.unwrap()).expect("Query failed")
                .expect("Task missing");
            assert_eq!(stored.estimate, 2.0);
        }
    }

    describe "move_to" {
        it "does nothing when member and date are unchanged" {
            let mut task = manager.create(&full_patch(member.id)).expect("Create failed");
            let date = task.date;

            manager.move_to(&mut task, member.id, date).expect("Move failed");

            assert_eq!(task.date, date);
            assert_eq!(task.member_id, member.id);
        }

        it "reassigns the day" {
            let mut task = manager.create(&full_patch(member.id)).expect("Create failed");
            let thursday = NaiveDate::from_ymd_opt(2015, 1, 8).unwrap();

            manager.move_to(&mut task, member.id, thursday).expect("Move failed");

            let stored = db.get_task(task.id.unwrap()).expect("Query failed")
                .expect("Task missing");
            assert_eq!(stored.date, thursday);
            assert_eq!(stored.member_id, member.id);
        }

        it "reassigns the member" {
            let other = db.create_member(member.board_id, CreateMemberInput {
                name: "Jane".to_string(),
                avatar: None,
            }).expect("Failed to create member");
            let mut task = manager.create(&full_patch(member.id)).expect("Create failed");

            let date = task.date;
            manager.move_to(&mut task, other.id, date).expect("Move failed");

            let stored = db.get_task(task.id.unwrap()).expect("Query failed")
                .expect("Task missing");
            assert_eq!(stored.member_id, other.id);
        }

        it "fails with NotFound for an unknown member and leaves the task alone" {
            let mut task = manager.create(&full_patch(member.id)).expect("Create failed");

            let date = task.date;
            let result = manager.move_to(&mut task, 9999, date);
            assert!(matches!(result, Err(Error::NotFound { .. })));

            let stored = db.get_task(task.id.unwrap()).expect("Query failed")
                .expect("Task missing");
            assert_eq!(stored.member_id, member.id);
        }
    }

    describe "conservation" {
        it "holds across a split followed by a merge" {
            let mut task = manager.create(&TaskPatch {
                estimate: Some(2.7),
                consumed: Some(1.3),
                remaining: Some(0.9),
                ..full_patch(member.id)
            }).expect("Create failed");

            let sibling = manager.split(&mut task).expect("Split failed");
            manager.merge(&sibling, &mut task).expect("Merge failed");

            assert!((task.estimate - 2.7).abs() < 1e-9);
            assert!((task.consumed - 1.3).abs() < 1e-9);
            assert!((task.remaining - 0.9).abs() < 1e-9);

            let tasks = db.get_tasks_by_member(member.id, None).expect("Query failed");
            assert_eq!(tasks.len(), 1);
        }
    }
}

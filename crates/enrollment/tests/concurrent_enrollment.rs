use core_types::GymClass;
use enrollment::{EnrollmentError, EnrollmentManager, EnrollmentStore, InMemoryRosterStore};
use std::thread;
use uuid::Uuid;

fn class(name: &str, capacity: u32) -> GymClass {
    GymClass {
        id: Uuid::new_v4(),
        name: name.to_string(),
        trainer_id: None,
        schedule: String::new(),
        capacity,
        current_enrollment: 0,
    }
}

#[test]
fn racing_enrollments_never_overbook_a_class() {
    let spin = class("Spin", 15);
    let class_id = spin.id;
    let manager = EnrollmentManager::new(InMemoryRosterStore::from_parts(vec![spin], Vec::new()));

    let results: Vec<Result<_, EnrollmentError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..40)
            .map(|_| scope.spawn(|| manager.enroll(Uuid::new_v4(), class_id)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let admitted = results.iter().filter(|r| r.is_ok()).count();
    let turned_away = results
        .iter()
        .filter(|r| matches!(r, Err(EnrollmentError::ClassFull { .. })))
        .count();
    assert_eq!(admitted, 15);
    assert_eq!(turned_away, 25);

    let roster = manager.store().roster(class_id).unwrap();
    assert_eq!(roster.class.current_enrollment, 15);
    assert_eq!(roster.enrollments.len(), 15);
    assert!(manager.audit().is_empty());
}

#[test]
fn mixed_enroll_and_unenroll_keep_counts_consistent() {
    let classes = vec![class("Yoga", 50), class("Boxing", 50)];
    let class_ids: Vec<Uuid> = classes.iter().map(|c| c.id).collect();
    let manager = EnrollmentManager::new(InMemoryRosterStore::from_parts(classes, Vec::new()));
    let members: Vec<Uuid> = (0..20).map(|_| Uuid::new_v4()).collect();

    thread::scope(|scope| {
        for &member_id in &members {
            for &class_id in &class_ids {
                let manager = &manager;
                scope.spawn(move || {
                    manager.enroll(member_id, class_id).unwrap();
                    if member_id.as_u128() % 2 == 0 {
                        assert!(manager.unenroll(member_id, class_id));
                    }
                });
            }
        }
    });

    let names: Vec<String> = manager.store().classes().into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Yoga", "Boxing"]);

    for roster in manager.store().rosters() {
        assert!(roster.is_consistent(), "{} drifted", roster.class.name);
        let kept = members.iter().filter(|m| m.as_u128() % 2 != 0).count();
        assert_eq!(roster.enrollments.len(), kept);
    }
}

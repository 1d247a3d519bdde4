//! Demo data loaded at startup so a fresh dashboard has something to show.

use crate::auth::ADMIN_ID;
use crate::models::{
    ActiveStatus, Appointment, AppointmentStatus, Coach, Contract, LogEntry, Member,
    MemberSummary, Membership, MembershipStatus, MembershipType, DEFAULT_AVATAR,
};
use crate::state::Repositories;
use crate::store::MemoryRepository;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .unwrap_or_default()
}

fn coaches() -> Vec<Coach> {
    let coach = |id, name: &str, mobile: &str, status, specialization: &str, created_at| Coach {
        id,
        name: name.to_string(),
        mobile: mobile.to_string(),
        avatar: DEFAULT_AVATAR.to_string(),
        status,
        specialization: specialization.to_string(),
        created_at,
    };
    vec![
        coach(1, "Coach Zhang", "13800138001", ActiveStatus::Active, "Strength training", at(2023, 1, 1, 8, 0, 0)),
        coach(2, "Coach Li", "13800138002", ActiveStatus::Active, "Cardio", at(2023, 1, 2, 9, 0, 0)),
        coach(3, "Coach Wang", "13800138003", ActiveStatus::Inactive, "Yoga", at(2023, 1, 3, 10, 0, 0)),
    ]
}

fn members() -> Vec<Member> {
    let member = |id, uid: &str, name: &str, mobile: &str, email: &str, status, created_at| Member {
        id,
        uid: uid.to_string(),
        name: name.to_string(),
        mobile: mobile.to_string(),
        email: Some(email.to_string()),
        avatar: DEFAULT_AVATAR.to_string(),
        status,
        created_at,
    };
    vec![
        member(
            1,
            "7446e84a-8f3b-439a-b5c7-1fa621ecdd19",
            "dhy",
            "13541075247",
            "dhy@example.com",
            ActiveStatus::Active,
            at(2023, 1, 1, 8, 0, 0),
        ),
        member(
            2,
            "user-002",
            "Zhang San",
            "13800138000",
            "zhangsan@example.com",
            ActiveStatus::Active,
            at(2023, 1, 2, 9, 0, 0),
        ),
        member(
            3,
            "c1d3e5f7-a9b1-4c3d-9e5f-7a9b1c3d5e7f",
            "Wang Wu",
            "13900003333",
            "wangwu@example.com",
            ActiveStatus::Inactive,
            at(2023, 1, 3, 10, 0, 0),
        ),
    ]
}

fn membership_types() -> Vec<MembershipType> {
    let ty = |id, name: &str, total_sessions, validity_days, max_leave_count, max_leave_duration| MembershipType {
        id,
        name: name.to_string(),
        total_sessions,
        validity_days,
        max_leave_count,
        max_leave_duration,
        created_at: at(2025, 4, 1, 9, 0, 0),
    };
    vec![
        ty(1, "Monthly card", 30, 30, 1, 7),
        ty(2, "Ten-session pack", 10, 365, 0, 0),
        ty(3, "Day pass", 1, 1, 0, 0),
    ]
}

fn memberships(members: &[Member], types: &[MembershipType]) -> Vec<Membership> {
    let card = |id, uid: &str, member: &Member, ty: &MembershipType, status, purchased_at: NaiveDateTime, remaining, revoke_reason: Option<&str>| {
        Membership {
            id,
            uid: uid.to_string(),
            user_id: member.id,
            type_id: ty.id,
            status,
            purchased_at,
            expired_at: purchased_at + chrono::Duration::days(ty.validity_days),
            total_sessions: ty.total_sessions,
            remaining_sessions: remaining,
            notes: String::new(),
            revoke_reason: revoke_reason.map(str::to_string),
            user_name: member.name.clone(),
            user_phone: member.mobile.clone(),
            type_name: ty.name.clone(),
            created_at: purchased_at,
            updated_at: purchased_at,
        }
    };
    vec![
        card(
            1,
            "5f0e6a1c-2b3d-4e5f-8a9b-0c1d2e3f4a5b",
            &members[0],
            &types[1],
            MembershipStatus::Revoked,
            at(2025, 4, 14, 9, 0, 0),
            10,
            Some("Issued twice"),
        ),
        card(
            2,
            "6a1b2c3d-4e5f-4a6b-9c8d-7e6f5a4b3c2d",
            &members[0],
            &types[0],
            MembershipStatus::Active,
            at(2025, 4, 15, 7, 47, 58),
            28,
            None,
        ),
        card(
            3,
            "7b2c3d4e-5f6a-4b7c-8d9e-0f1a2b3c4d5e",
            &members[1],
            &types[2],
            MembershipStatus::Expired,
            at(2025, 3, 1, 10, 0, 0),
            0,
            None,
        ),
    ]
}

fn appointments() -> Vec<Appointment> {
    let appointment = |id, uid: &str, membership_id, coach_id, start, end, status, note: Option<&str>| Appointment {
        id,
        uid: uid.to_string(),
        membership_id,
        coach_id,
        appointment_start: start,
        appointment_end: end,
        status,
        cancellation_note: note.map(str::to_string),
    };
    vec![
        appointment(
            1,
            "7446e84a-8f3b-439a-b5c7-1fa621ecdd19",
            1,
            1,
            at(2025, 4, 15, 16, 0, 0),
            at(2025, 4, 15, 17, 0, 0),
            AppointmentStatus::Scheduled,
            None,
        ),
        appointment(
            2,
            "9c7fcb5d-6e1a-4d3e-8b2f-f5a8d3e7c2b1",
            2,
            2,
            at(2025, 4, 16, 10, 0, 0),
            at(2025, 4, 16, 11, 0, 0),
            AppointmentStatus::Completed,
            None,
        ),
        appointment(
            3,
            "a2b4c6d8-e0f2-4a6c-8d0e-2f4a6c8e0d2f",
            1,
            3,
            at(2025, 4, 17, 14, 0, 0),
            at(2025, 4, 17, 15, 0, 0),
            AppointmentStatus::Cancelled,
            Some("Member had a last-minute conflict"),
        ),
    ]
}

fn contracts(members: &[Member]) -> Vec<Contract> {
    let contract = |id, uid: &str, title: &str, description: &str, image: &str, created_at: NaiveDateTime, created_by, member: &Member| {
        let created_at = created_at.and_utc();
        Contract {
            id,
            uid: uid.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            contract_image: image.to_string(),
            status: "active".to_string(),
            created_by,
            user_id: member.id,
            user: Some(MemberSummary::from(member)),
            created_at,
            updated_at: Some(created_at),
        }
    };
    vec![
        contract(
            1,
            "0d9c8b7a-6f5e-4d3c-9b2a-1f0e9d8c7b6a",
            "Membership agreement",
            "One-year membership with access to all facilities",
            "/static/contracts/sample1.jpg",
            at(2023, 1, 15, 8, 30, 0),
            1,
            &members[0],
        ),
        contract(
            2,
            "1e0d9c8b-7a6f-4e5d-8c3b-2a1f0e9d8c7b",
            "Personal training agreement",
            "Three months of personal training, two sessions a week",
            "/static/contracts/sample2.jpg",
            at(2023, 2, 20, 14, 15, 0),
            1,
            &members[0],
        ),
        contract(
            3,
            "2f1e0d9c-8b7a-4f6e-9d4c-3b2a1f0e9d8c",
            "Gym membership terms",
            "Six-month membership including group classes",
            "/static/contracts/sample3.jpg",
            at(2023, 3, 5, 9, 45, 0),
            2,
            &members[1],
        ),
    ]
}

fn logs(cards: &[Membership]) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    for card in cards {
        let mut issued = LogEntry::membership_issued(card, ADMIN_ID);
        issued.timestamp = card.purchased_at;
        entries.push(issued);

        if card.status == MembershipStatus::Revoked {
            let mut revoked = LogEntry::membership_revoked(card, ADMIN_ID);
            revoked.timestamp = card.purchased_at + chrono::Duration::minutes(5);
            entries.push(revoked);
        }
    }
    entries.sort_by_key(|entry| entry.timestamp);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.id = index as i64 + 1;
    }
    entries
}

/// In-memory repositories pre-filled with the demo data set.
pub fn demo_repositories() -> Repositories {
    let members = members();
    let types = membership_types();
    let cards = memberships(&members, &types);

    Repositories {
        coaches: Arc::new(MemoryRepository::with_records(coaches())),
        contracts: Arc::new(MemoryRepository::with_records(contracts(&members))),
        logs: Arc::new(MemoryRepository::with_records(logs(&cards))),
        appointments: Arc::new(MemoryRepository::with_records(appointments())),
        memberships: Arc::new(MemoryRepository::with_records(cards)),
        membership_types: Arc::new(MemoryRepository::with_records(types)),
        members: Arc::new(MemoryRepository::with_records(members)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordKey;

    #[tokio::test]
    async fn test_demo_data_is_consistent() {
        let repos = demo_repositories();

        assert_eq!(repos.coaches.count().await.unwrap(), 3);
        assert_eq!(repos.members.count().await.unwrap(), 3);
        assert_eq!(repos.appointments.count().await.unwrap(), 3);
        assert_eq!(repos.contracts.count().await.unwrap(), 3);

        let member = repos.members.get(&RecordKey::from("user-002")).await.unwrap();
        assert_eq!(member.id, 2);

        for contract in repos.contracts.list().await.unwrap() {
            let owner = repos.members.get(&RecordKey::from(contract.user_id)).await.unwrap();
            assert_eq!(contract.user.unwrap().uid, owner.uid);
        }
    }

    #[test]
    fn test_logs_follow_card_history() {
        let members = members();
        let cards = memberships(&members, &membership_types());
        let entries = logs(&cards);

        // three issues plus one revoke
        assert_eq!(entries.len(), 4);
        assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(entries.last().map(|e| e.id), Some(4));
    }
}

//! Demo seed data
//!
//! The record set served in mock mode.

use super::records::*;
use super::FixtureStore;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    ts(year, month, day, 0, 0)
}

fn s(value: &str) -> Option<String> {
    Some(value.to_string())
}

impl FixtureStore {
    /// The demo data set
    pub fn seed() -> Self {
        Self {
            companies: companies(),
            locations: locations(),
            modems: modems(),
            sim_cards: sim_cards(),
            work_orders: work_orders(),
            test_scenarios: test_scenarios(),
            test_sessions: test_sessions(),
            scrap_requests: scrap_requests(),
            alerts: alerts(),
            activity_logs: activity_logs(),
            users: users(),
        }
    }
}

fn companies() -> Vec<Company> {
    [
        ("comp-1", "Turkcell Teknoloji", "contact@turkcell.com.tr", "+90 212 313 1313", 1),
        ("comp-2", "Vodafone Turkey", "support@vodafone.com.tr", "+90 544 540 5405", 2),
        ("comp-3", "Turk Telekom", "info@turktelekom.com.tr", "+90 444 1 444", 3),
    ]
    .into_iter()
    .map(|(id, name, email, phone, d)| Company {
        id: id.into(),
        name: name.into(),
        contact_email: s(email),
        contact_phone: s(phone),
        is_active: true,
        created_at: day(2024, 1, d),
        updated_at: day(2024, 1, d),
    })
    .collect()
}

fn locations() -> Vec<Location> {
    [
        ("loc-1", "Istanbul Central Depot", LocationType::Depot, "Maslak, Buyukdere Ave. 123, Sisli/Istanbul", "41.1079,29.0233"),
        ("loc-2", "Ankara Field Office", LocationType::Field, "Cankaya, Ataturk Blvd. 45, Cankaya/Ankara", "39.9208,32.8541"),
        ("loc-3", "Izmir Depot", LocationType::Depot, "Alsancak, Kordon 67, Konak/Izmir", "38.4237,27.1428"),
        ("loc-4", "Test Laboratory", LocationType::Headquarters, "Technopark Campus, Cankaya/Ankara", "39.8917,32.7814"),
    ]
    .into_iter()
    .map(|(id, name, location_type, address, coordinates)| Location {
        id: id.into(),
        name: name.into(),
        location_type,
        address: s(address),
        coordinates: s(coordinates),
        is_active: true,
        created_at: day(2024, 1, 1),
    })
    .collect()
}

fn modems() -> Vec<Modem> {
    vec![
        Modem {
            id: "modem-1".into(),
            imei: "352094087654321".into(),
            model: "Huawei B535-232".into(),
            brand: "Huawei".into(),
            status: ModemStatus::FieldActive,
            location_id: s("loc-1"),
            company_id: s("comp-1"),
            warranty_end_date: Some(day(2025, 6, 15)),
            repair_count: 0,
            last_signal_strength: Some(-75),
            battery_level: Some(85),
            firmware_version: s("11.189.63.00.00"),
            is_online: true,
            last_seen_at: Some(ts(2024, 8, 29, 10, 30)),
            notes: s("Field installation completed"),
            created_at: day(2024, 1, 15),
            updated_at: day(2024, 8, 29),
        },
        Modem {
            id: "modem-2".into(),
            imei: "352094087654322".into(),
            model: "ZTE MF286R".into(),
            brand: "ZTE".into(),
            status: ModemStatus::Depot,
            location_id: s("loc-2"),
            company_id: s("comp-2"),
            warranty_end_date: Some(day(2024, 12, 20)),
            repair_count: 1,
            last_signal_strength: None,
            battery_level: None,
            firmware_version: s("B08"),
            is_online: false,
            last_seen_at: Some(ts(2024, 8, 25, 14, 20)),
            notes: s("Waiting in depot"),
            created_at: day(2024, 2, 1),
            updated_at: day(2024, 8, 25),
        },
        Modem {
            id: "modem-3".into(),
            imei: "352094087654323".into(),
            model: "Nokia FastMile 5G21".into(),
            brand: "Nokia".into(),
            status: ModemStatus::Testing,
            location_id: s("loc-4"),
            company_id: s("comp-1"),
            warranty_end_date: Some(day(2026, 3, 10)),
            repair_count: 0,
            last_signal_strength: Some(-68),
            battery_level: Some(92),
            firmware_version: s("3FGPP01.01.01.00"),
            is_online: true,
            last_seen_at: Some(ts(2024, 8, 29, 11, 15)),
            notes: s("5G performance test in progress"),
            created_at: day(2024, 3, 10),
            updated_at: day(2024, 8, 29),
        },
        Modem {
            id: "modem-4".into(),
            imei: "352094087654324".into(),
            model: "Ericsson Router 6000".into(),
            brand: "Ericsson".into(),
            status: ModemStatus::Repair,
            location_id: s("loc-4"),
            company_id: s("comp-3"),
            warranty_end_date: Some(day(2025, 1, 30)),
            repair_count: 2,
            last_signal_strength: None,
            battery_level: None,
            firmware_version: s("22.1.R1A"),
            is_online: false,
            last_seen_at: Some(ts(2024, 8, 20, 9, 45)),
            notes: s("Power supply fault detected"),
            created_at: day(2024, 1, 30),
            updated_at: day(2024, 8, 20),
        },
        Modem {
            id: "modem-5".into(),
            imei: "352094087654325".into(),
            model: "Huawei B525s-23a".into(),
            brand: "Huawei".into(),
            status: ModemStatus::FieldActive,
            location_id: s("loc-2"),
            company_id: s("comp-2"),
            warranty_end_date: Some(day(2025, 9, 15)),
            repair_count: 0,
            last_signal_strength: Some(-82),
            battery_level: Some(78),
            firmware_version: s("11.189.63.00.00"),
            is_online: true,
            last_seen_at: Some(ts(2024, 8, 29, 10, 45)),
            notes: s("Operating normally"),
            created_at: day(2024, 4, 15),
            updated_at: day(2024, 8, 29),
        },
    ]
}

fn sim_cards() -> Vec<SimCard> {
    [
        ("sim-1", "8990001234567890123", "+905551234567", "Turkcell", Some("modem-1"), "POOL-001", 100_000, 45_230, "TR-34", day(2024, 1, 15)),
        ("sim-2", "8990001234567890124", "+905557654321", "Vodafone", Some("modem-5"), "POOL-002", 50_000, 32_100, "TR-06", day(2024, 4, 15)),
        ("sim-3", "8990001234567890125", "+905559876543", "Turk Telekom", None, "POOL-003", 200_000, 0, "TR-35", day(2024, 3, 10)),
    ]
    .into_iter()
    .map(
        |(id, iccid, phone, operator, modem_id, pool, allowance, used, region, created_at)| SimCard {
            id: id.into(),
            iccid: iccid.into(),
            phone_number: s(phone),
            operator: operator.into(),
            modem_id: modem_id.map(String::from),
            pool_id: s(pool),
            is_active: true,
            data_allowance: allowance,
            data_used: used,
            billing_status: "active".into(),
            region_code: s(region),
            created_at,
            updated_at: day(2024, 8, 29),
        },
    )
    .collect()
}

fn work_orders() -> Vec<WorkOrder> {
    vec![
        WorkOrder {
            id: "wo-1".into(),
            order_number: "WO-2024-001".into(),
            modem_id: s("modem-1"),
            assigned_user_id: s("user-1"),
            order_type: WorkOrderType::Installation,
            priority: WorkOrderPriority::High,
            status: WorkOrderStatus::Completed,
            description: "New 5G modem installation at Istanbul Maslak".into(),
            sla_deadline: Some(ts(2024, 8, 30, 17, 0)),
            started_at: Some(ts(2024, 8, 29, 9, 0)),
            completed_at: Some(ts(2024, 8, 29, 15, 30)),
            resolution_notes: s("Installation completed, signal level optimal."),
            created_at: day(2024, 8, 28),
            updated_at: day(2024, 8, 29),
        },
        WorkOrder {
            id: "wo-2".into(),
            order_number: "WO-2024-002".into(),
            modem_id: s("modem-4"),
            assigned_user_id: s("user-1"),
            order_type: WorkOrderType::Repair,
            priority: WorkOrderPriority::Critical,
            status: WorkOrderStatus::InProgress,
            description: "Ericsson router power supply failure".into(),
            sla_deadline: Some(ts(2024, 8, 30, 12, 0)),
            started_at: Some(ts(2024, 8, 29, 8, 0)),
            completed_at: None,
            resolution_notes: None,
            created_at: day(2024, 8, 20),
            updated_at: day(2024, 8, 29),
        },
        WorkOrder {
            id: "wo-3".into(),
            order_number: "WO-2024-003".into(),
            modem_id: s("modem-3"),
            assigned_user_id: s("user-1"),
            order_type: WorkOrderType::Replacement,
            priority: WorkOrderPriority::Normal,
            status: WorkOrderStatus::Pending,
            description: "Nokia FastMile evaluation after 5G performance test".into(),
            sla_deadline: Some(ts(2024, 9, 5, 16, 0)),
            started_at: None,
            completed_at: None,
            resolution_notes: None,
            created_at: day(2024, 8, 28),
            updated_at: day(2024, 8, 28),
        },
    ]
}

fn steps(items: &[(&str, &str)]) -> Vec<TestStep> {
    items
        .iter()
        .zip(1..)
        .map(|((action, expected), step)| TestStep {
            step,
            action: action.to_string(),
            expected: expected.to_string(),
        })
        .collect()
}

fn test_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario {
            id: "test-1".into(),
            name: "5G Connectivity Test".into(),
            description: s("5G network attach and throughput test"),
            steps: steps(&[
                ("Attach device to the 5G network", "Connection established"),
                ("Run speed test", "At least 100 Mbps download"),
                ("Measure signal strength", "Above -80 dBm"),
            ]),
            is_active: true,
            created_by: s("user-1"),
            created_at: day(2024, 1, 10),
        },
        TestScenario {
            id: "test-2".into(),
            name: "Power Consumption Test".into(),
            description: s("Power draw and battery endurance test"),
            steps: steps(&[
                ("Start from full charge", "100% battery"),
                ("Run continuously for 8 hours", "At least 20% battery left"),
                ("Check temperature", "Below 60°C"),
            ]),
            is_active: true,
            created_by: s("user-1"),
            created_at: day(2024, 1, 15),
        },
    ]
}

fn log(at: DateTime<Utc>, message: &str) -> SessionLog {
    SessionLog {
        timestamp: at,
        message: message.to_string(),
    }
}

fn test_sessions() -> Vec<TestSession> {
    vec![
        TestSession {
            id: "session-1".into(),
            modem_id: "modem-3".into(),
            scenario_id: "test-1".into(),
            technician_id: s("user-1"),
            bench_number: s("BENCH-01"),
            status: TestSessionStatus::Running,
            result: None,
            logs: vec![
                log(ts(2024, 8, 29, 10, 0), "Test started"),
                log(ts(2024, 8, 29, 10, 5), "5G connection established"),
                log(ts(2024, 8, 29, 10, 10), "Speed test started"),
            ],
            started_at: Some(ts(2024, 8, 29, 10, 0)),
            completed_at: None,
            created_at: ts(2024, 8, 29, 9, 55),
        },
        TestSession {
            id: "session-2".into(),
            modem_id: "modem-1".into(),
            scenario_id: "test-2".into(),
            technician_id: s("user-1"),
            bench_number: s("BENCH-02"),
            status: TestSessionStatus::Completed,
            result: Some(TestResult::Pass),
            logs: vec![
                log(ts(2024, 8, 28, 9, 0), "Power test started"),
                log(ts(2024, 8, 28, 17, 0), "8 hour run finished"),
                log(ts(2024, 8, 28, 17, 5), "Result: pass, 25% battery left"),
            ],
            started_at: Some(ts(2024, 8, 28, 9, 0)),
            completed_at: Some(ts(2024, 8, 28, 17, 5)),
            created_at: ts(2024, 8, 28, 8, 55),
        },
    ]
}

fn scrap_requests() -> Vec<ScrapRequest> {
    vec![
        ScrapRequest {
            id: "scrap-1".into(),
            modem_id: "modem-4".into(),
            requested_by: "user-1".into(),
            reason: "Recurring power supply failure, end of economic life".into(),
            status: ScrapStatus::Pending,
            reviewed_by: None,
            review_notes: None,
            reviewed_at: None,
            created_at: day(2024, 8, 25),
        },
        ScrapRequest {
            id: "scrap-2".into(),
            modem_id: "modem-2".into(),
            requested_by: "user-1".into(),
            reason: "Physical damage, cracked enclosure".into(),
            status: ScrapStatus::Approved,
            reviewed_by: s("user-1"),
            review_notes: s("Photos reviewed, scrap approved"),
            reviewed_at: Some(ts(2024, 8, 20, 14, 30)),
            created_at: day(2024, 8, 15),
        },
    ]
}

fn alerts() -> Vec<Alert> {
    vec![
        Alert {
            id: "alert-1".into(),
            alert_type: "sla_warning".into(),
            severity: AlertSeverity::Warning,
            title: "SLA Warning".into(),
            message: "SLA deadline for work order WO-2024-002 is approaching (2 hours left)".into(),
            entity_type: s("work_order"),
            entity_id: s("wo-2"),
            is_read: false,
            user_id: s("user-1"),
            created_at: ts(2024, 8, 29, 10, 0),
        },
        Alert {
            id: "alert-2".into(),
            alert_type: "device_offline".into(),
            severity: AlertSeverity::Critical,
            title: "Device Offline".into(),
            message: "Modem 352094087654324 (Ericsson Router 6000) offline for 9 days".into(),
            entity_type: s("modem"),
            entity_id: s("modem-4"),
            is_read: false,
            user_id: None,
            created_at: ts(2024, 8, 29, 8, 30),
        },
        Alert {
            id: "alert-3".into(),
            alert_type: "low_battery".into(),
            severity: AlertSeverity::Info,
            title: "Low Battery".into(),
            message: "Modem 352094087654325 battery dropped to 78%".into(),
            entity_type: s("modem"),
            entity_id: s("modem-5"),
            is_read: true,
            user_id: s("user-1"),
            created_at: ts(2024, 8, 29, 7, 45),
        },
    ]
}

fn activity_logs() -> Vec<ActivityLog> {
    let entry = |id: &str,
                 action: &str,
                 entity_type: &str,
                 entity_id: &str,
                 old: Option<Value>,
                 new: Option<Value>,
                 at: DateTime<Utc>| {
        ActivityLog {
            id: id.into(),
            user_id: s("user-1"),
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            old_data: old,
            new_data: new,
            ip_address: s("192.168.1.100"),
            user_agent: s("Mozilla/5.0"),
            created_at: at,
        }
    };

    vec![
        entry(
            "log-1",
            "create_work_order",
            "work_order",
            "wo-1",
            None,
            Some(json!({"orderNumber": "WO-2024-001", "status": "pending"})),
            ts(2024, 8, 28, 15, 30),
        ),
        entry(
            "log-2",
            "update_modem",
            "modem",
            "modem-1",
            Some(json!({"status": "depot"})),
            Some(json!({"status": "field_active"})),
            ts(2024, 8, 29, 9, 15),
        ),
        entry(
            "log-3",
            "create_company",
            "company",
            "comp-1",
            None,
            Some(json!({"name": "Turkcell Teknoloji"})),
            ts(2024, 1, 1, 10, 0),
        ),
    ]
}

fn users() -> Vec<User> {
    vec![User {
        id: "user-1".into(),
        email: "admin@telecomims.com".into(),
        first_name: s("Admin"),
        last_name: s("User"),
        role: "admin".into(),
        profile_image_url: None,
        created_at: day(2024, 1, 1),
        updated_at: day(2024, 1, 1),
    }]
}

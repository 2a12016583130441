//! Mock records the dashboard starts with. Nothing here is persisted.

use crate::model::{
    Appointment, AppointmentKind, AppointmentStatus, ChatMessage, ChatSender, Client,
    Conversation, EmploymentType, FileCategory, FileKind, FundingType, Incident, IncidentStatus,
    Invoice, InvoiceStatus, Message, Priority, Reminder, Sender, Severity, StaffMember, StaffRole,
    StoredFile, Task,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::{BTreeSet, HashMap};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
}

fn stamp(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_time(at(h, m))
}

fn reminders(list: &[Reminder]) -> BTreeSet<Reminder> {
    list.iter().copied().collect()
}

pub fn clients() -> Vec<Client> {
    vec![
        Client {
            id: "c1".into(),
            name: "John Doe".into(),
            date_of_birth: day(1990, 1, 1),
            ndis_number: "NDIS123456".into(),
            funding_type: FundingType::Ndis,
            phone: "0412 345 678".into(),
            email: "john.doe@example.com".into(),
            assigned_professional: "Dr. Smith".into(),
        },
        Client {
            id: "c2".into(),
            name: "Jane Smith".into(),
            date_of_birth: day(1985, 5, 15),
            ndis_number: "NDIS789012".into(),
            funding_type: FundingType::Private,
            phone: "0423 456 789".into(),
            email: "jane.smith@example.com".into(),
            assigned_professional: "Dr. Johnson".into(),
        },
        Client {
            id: "c3".into(),
            name: "Robert Williams".into(),
            date_of_birth: day(1972, 9, 30),
            ndis_number: "NDIS345678".into(),
            funding_type: FundingType::Ndis,
            phone: "0434 567 890".into(),
            email: "robert.williams@example.com".into(),
            assigned_professional: "Dr. Smith".into(),
        },
    ]
}

pub fn staff() -> Vec<StaffMember> {
    vec![
        StaffMember {
            id: "s1".into(),
            name: "Dr. Sarah Smith".into(),
            role: StaffRole::OccupationalTherapist,
            email: "sarah.smith@enabl.com".into(),
            phone: "0412 345 678".into(),
            employment_type: EmploymentType::FullTime,
            start_date: day(2024, 1, 15),
            is_active: true,
        },
        StaffMember {
            id: "s2".into(),
            name: "John Johnson".into(),
            role: StaffRole::Physiotherapist,
            email: "john.johnson@enabl.com".into(),
            phone: "0423 456 789".into(),
            employment_type: EmploymentType::PartTime,
            start_date: day(2024, 3, 1),
            is_active: true,
        },
    ]
}

pub fn invoices() -> Vec<Invoice> {
    vec![
        Invoice {
            id: "i1".into(),
            invoice_number: "INV-2024-001".into(),
            client_id: "c1".into(),
            description: "Occupational Therapy Session".into(),
            date: day(2024, 12, 1),
            amount: 15000,
            status: InvoiceStatus::Paid,
            paid_date: Some(day(2024, 12, 5)),
            due_date: None,
            notes: None,
        },
        Invoice {
            id: "i2".into(),
            invoice_number: "INV-2024-002".into(),
            client_id: "c2".into(),
            description: "Physiotherapy Consultation".into(),
            date: day(2024, 12, 3),
            amount: 20000,
            status: InvoiceStatus::Pending,
            paid_date: None,
            due_date: Some(day(2024, 12, 17)),
            notes: None,
        },
        Invoice {
            id: "i3".into(),
            invoice_number: "INV-2024-003".into(),
            client_id: "c1".into(),
            description: "Assessment Report".into(),
            date: day(2024, 12, 8),
            amount: 30000,
            status: InvoiceStatus::Overdue,
            paid_date: None,
            due_date: Some(day(2024, 12, 8)),
            notes: None,
        },
    ]
}

pub fn incidents() -> Vec<Incident> {
    vec![
        Incident {
            id: "n1".into(),
            incident_number: "INC-2024-001".into(),
            client_id: "c1".into(),
            description: "Client slipped on wet floor during therapy session".into(),
            date: day(2024, 12, 1),
            time: at(14, 30),
            severity: Severity::Moderate,
            status: IncidentStatus::Reviewed,
            reporter: "Dr. Sarah Smith".into(),
            actions_taken: "First aid provided, family notified, incident documented".into(),
        },
        Incident {
            id: "n2".into(),
            incident_number: "INC-2024-002".into(),
            client_id: "c2".into(),
            description: "Equipment malfunction during physiotherapy".into(),
            date: day(2024, 12, 5),
            time: at(10, 15),
            severity: Severity::Low,
            status: IncidentStatus::UnderReview,
            reporter: "John Johnson".into(),
            actions_taken: "Session paused, equipment removed from service".into(),
        },
        Incident {
            id: "n3".into(),
            incident_number: "INC-2024-003".into(),
            client_id: "c3".into(),
            description: "Client experienced dizziness and shortness of breath".into(),
            date: day(2024, 12, 8),
            time: at(11, 0),
            severity: Severity::High,
            status: IncidentStatus::Pending,
            reporter: "Dr. Sarah Smith".into(),
            actions_taken: "Emergency services called, family contacted".into(),
        },
    ]
}

pub fn appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            id: "a1".into(),
            client_id: "c1".into(),
            staff_name: "Dr. Sarah Smith".into(),
            service: "Occupational Therapy".into(),
            date: day(2024, 12, 15),
            time: at(10, 0),
            duration_minutes: 60,
            kind: AppointmentKind::InPerson,
            location: "Room 101".into(),
            status: AppointmentStatus::Confirmed,
            reminders: reminders(&[Reminder::Email, Reminder::Sms]),
        },
        Appointment {
            id: "a2".into(),
            client_id: "c2".into(),
            staff_name: "John Johnson".into(),
            service: "Physiotherapy".into(),
            date: day(2024, 12, 15),
            time: at(14, 30),
            duration_minutes: 45,
            kind: AppointmentKind::Online,
            location: "Video Call".into(),
            status: AppointmentStatus::Pending,
            reminders: reminders(&[Reminder::Email]),
        },
        Appointment {
            id: "a3".into(),
            client_id: "c3".into(),
            staff_name: "Dr. Sarah Smith".into(),
            service: "Assessment".into(),
            date: day(2024, 12, 16),
            time: at(9, 0),
            duration_minutes: 90,
            kind: AppointmentKind::InPerson,
            location: "Room 102".into(),
            status: AppointmentStatus::Confirmed,
            reminders: reminders(&[Reminder::Email, Reminder::Sms]),
        },
    ]
}

pub fn conversations() -> Vec<Conversation> {
    vec![
        Conversation {
            id: "v1".into(),
            client_id: "c1".into(),
            last_message: "Thank you for the session today!".into(),
            timestamp: stamp(day(2024, 12, 10), 14, 30),
            unread: 2,
            encrypted: true,
        },
        Conversation {
            id: "v2".into(),
            client_id: "c2".into(),
            last_message: "Can we reschedule tomorrow's appointment?".into(),
            timestamp: stamp(day(2024, 12, 10), 10, 15),
            unread: 0,
            encrypted: true,
        },
        Conversation {
            id: "v3".into(),
            client_id: "c3".into(),
            last_message: "I have a question about the exercises".into(),
            timestamp: stamp(day(2024, 12, 9), 16, 45),
            unread: 1,
            encrypted: true,
        },
    ]
}

pub fn messages() -> HashMap<String, Vec<Message>> {
    let msg = |id: &str, sender: Sender, text: &str, ts: NaiveDateTime| Message {
        id: id.into(),
        sender,
        text: text.into(),
        timestamp: ts,
    };
    let dec10 = day(2024, 12, 10);
    let dec9 = day(2024, 12, 9);
    HashMap::from([
        (
            "v1".to_string(),
            vec![
                msg(
                    "m1",
                    Sender::Client,
                    "Hi Dr. Smith, thank you for today's session!",
                    stamp(dec10, 14, 15),
                ),
                msg(
                    "m2",
                    Sender::Staff,
                    "You're welcome, John! Keep up the great work with your exercises.",
                    stamp(dec10, 14, 20),
                ),
                msg(
                    "m3",
                    Sender::Client,
                    "Will do! See you next week.",
                    stamp(dec10, 14, 30),
                ),
            ],
        ),
        (
            "v2".to_string(),
            vec![
                msg(
                    "m4",
                    Sender::Client,
                    "Hi, something came up. Can we reschedule tomorrow's appointment?",
                    stamp(dec10, 10, 15),
                ),
                msg(
                    "m5",
                    Sender::Staff,
                    "Of course! Let me check available times.",
                    stamp(dec10, 10, 20),
                ),
            ],
        ),
        (
            "v3".to_string(),
            vec![msg(
                "m6",
                Sender::Client,
                "I have a question about the exercises you showed me",
                stamp(dec9, 16, 45),
            )],
        ),
    ])
}

pub fn files() -> Vec<StoredFile> {
    vec![
        StoredFile {
            id: "f1".into(),
            name: "John_Doe_Assessment_Report.pdf".into(),
            client_id: "c1".into(),
            kind: FileKind::Document,
            size_label: "2.4 MB".into(),
            uploaded_by: "Dr. Sarah Smith".into(),
            upload_date: day(2024, 12, 1),
            category: FileCategory::Assessments,
        },
        StoredFile {
            id: "f2".into(),
            name: "Therapy_Plan_Jane_Smith.pdf".into(),
            client_id: "c2".into(),
            kind: FileKind::Document,
            size_label: "1.8 MB".into(),
            uploaded_by: "John Johnson".into(),
            upload_date: day(2024, 12, 5),
            category: FileCategory::TherapyPlans,
        },
        StoredFile {
            id: "f3".into(),
            name: "Progress_Photo_Dec.jpg".into(),
            client_id: "c1".into(),
            kind: FileKind::Image,
            size_label: "856 KB".into(),
            uploaded_by: "Dr. Sarah Smith".into(),
            upload_date: day(2024, 12, 8),
            category: FileCategory::ProgressPhotos,
        },
        StoredFile {
            id: "f4".into(),
            name: "Exercise_Demo_Video.mp4".into(),
            client_id: "c2".into(),
            kind: FileKind::Video,
            size_label: "12.3 MB".into(),
            uploaded_by: "John Johnson".into(),
            upload_date: day(2024, 12, 9),
            category: FileCategory::Videos,
        },
    ]
}

pub fn tasks() -> Vec<Task> {
    vec![
        Task {
            id: "t1".into(),
            patient_room: "101".into(),
            description: "Administer morning medication".into(),
            priority: Priority::Stat,
            completed: false,
            due_time: at(8, 0),
        },
        Task {
            id: "t2".into(),
            patient_room: "102".into(),
            description: "Update care plan notes".into(),
            priority: Priority::Urgent,
            completed: false,
            due_time: at(10, 30),
        },
        Task {
            id: "t3".into(),
            patient_room: "204".into(),
            description: "Check vitals".into(),
            priority: Priority::Routine,
            completed: true,
            due_time: at(12, 0),
        },
    ]
}

pub fn chat_history() -> Vec<ChatMessage> {
    vec![ChatMessage {
        id: "welcome".into(),
        sender: ChatSender::Assistant,
        text: "Hello! I can help with protocols, dosages and IV rates. What do you need?".into(),
    }]
}

/// Static feed shown on the dashboard.
pub fn recent_activity() -> Vec<(&'static str, &'static str)> {
    vec![
        ("New client record added: Sarah Johnson", "2 hours ago"),
        ("Invoice INV-2024-045 marked as paid", "3 hours ago"),
        ("Incident report reviewed and closed", "5 hours ago"),
        ("Appointment scheduled for next week", "1 day ago"),
    ]
}

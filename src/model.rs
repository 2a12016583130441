use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type RecordId = String;
pub type ClientId = String;

pub const UNKNOWN_CLIENT: &str = "Unknown client";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("client not found: {0}")]
    ClientNotFound(String),
    #[error("no clients on record")]
    NoClients,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub ndis_number: String,
    pub funding_type: FundingType,
    pub phone: String,
    pub email: String,
    pub assigned_professional: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum FundingType {
    #[serde(rename = "NDIS")]
    Ndis,
    Private,
    #[serde(rename = "DVA")]
    Dva,
    Medicare,
    Other,
}

impl FundingType {
    pub const ALL: &'static [FundingType] = &[
        FundingType::Ndis,
        FundingType::Private,
        FundingType::Dva,
        FundingType::Medicare,
        FundingType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FundingType::Ndis => "NDIS",
            FundingType::Private => "Private",
            FundingType::Dva => "DVA",
            FundingType::Medicare => "Medicare",
            FundingType::Other => "Other",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StaffMember {
    pub id: RecordId,
    pub name: String,
    pub role: StaffRole,
    pub email: String,
    pub phone: String,
    pub employment_type: EmploymentType,
    pub start_date: NaiveDate,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum StaffRole {
    Therapist,
    OccupationalTherapist,
    Physiotherapist,
    SpeechPathologist,
    SupportWorker,
    Nurse,
    Administrator,
    Other,
}

impl StaffRole {
    pub const ALL: &'static [StaffRole] = &[
        StaffRole::Therapist,
        StaffRole::OccupationalTherapist,
        StaffRole::Physiotherapist,
        StaffRole::SpeechPathologist,
        StaffRole::SupportWorker,
        StaffRole::Nurse,
        StaffRole::Administrator,
        StaffRole::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StaffRole::Therapist => "Therapist",
            StaffRole::OccupationalTherapist => "Occupational Therapist",
            StaffRole::Physiotherapist => "Physiotherapist",
            StaffRole::SpeechPathologist => "Speech Pathologist",
            StaffRole::SupportWorker => "Support Worker",
            StaffRole::Nurse => "Nurse",
            StaffRole::Administrator => "Administrator",
            StaffRole::Other => "Other",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Casual,
    Contract,
}

impl EmploymentType {
    pub const ALL: &'static [EmploymentType] = &[
        EmploymentType::FullTime,
        EmploymentType::PartTime,
        EmploymentType::Casual,
        EmploymentType::Contract,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Casual => "Casual",
            EmploymentType::Contract => "Contract",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Invoice {
    pub id: RecordId,
    pub invoice_number: String,
    pub client_id: ClientId,
    pub description: String,
    pub date: NaiveDate,
    /// Whole cents.
    pub amount: i64,
    pub status: InvoiceStatus,
    pub paid_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: &'static [InvoiceStatus] = &[
        InvoiceStatus::Paid,
        InvoiceStatus::Pending,
        InvoiceStatus::Overdue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Incident {
    pub id: RecordId,
    pub incident_number: String,
    pub client_id: ClientId,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub reporter: String,
    pub actions_taken: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Moderate,
    Low,
}

impl Severity {
    pub const ALL: &'static [Severity] = &[Severity::High, Severity::Moderate, Severity::Low];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Moderate => "moderate",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Pending,
    UnderReview,
    Reviewed,
}

impl IncidentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            IncidentStatus::Pending => "pending",
            IncidentStatus::UnderReview => "under review",
            IncidentStatus::Reviewed => "reviewed",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Appointment {
    pub id: RecordId,
    pub client_id: ClientId,
    pub staff_name: String,
    pub service: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub kind: AppointmentKind,
    pub location: String,
    pub status: AppointmentStatus,
    pub reminders: BTreeSet<Reminder>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentKind {
    InPerson,
    Online,
}

impl AppointmentKind {
    pub const ALL: &'static [AppointmentKind] =
        &[AppointmentKind::InPerson, AppointmentKind::Online];

    pub fn label(&self) -> &'static str {
        match self {
            AppointmentKind::InPerson => "in-person",
            AppointmentKind::Online => "online",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl AppointmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Reminder {
    Email,
    Sms,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Conversation {
    pub id: RecordId,
    pub client_id: ClientId,
    pub last_message: String,
    pub timestamp: NaiveDateTime,
    pub unread: u32,
    pub encrypted: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub id: RecordId,
    pub sender: Sender,
    pub text: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Client,
    Staff,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoredFile {
    pub id: RecordId,
    pub name: String,
    pub client_id: ClientId,
    pub kind: FileKind,
    /// Display text such as "2.4 MB"; see `list::parse_size_label`.
    pub size_label: String,
    pub uploaded_by: String,
    pub upload_date: NaiveDate,
    pub category: FileCategory,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Document,
    Image,
    Video,
    Other,
}

impl FileKind {
    pub const ALL: &'static [FileKind] = &[
        FileKind::Document,
        FileKind::Image,
        FileKind::Video,
        FileKind::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Document => "document",
            FileKind::Image => "image",
            FileKind::Video => "video",
            FileKind::Other => "other",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileCategory {
    Assessments,
    TherapyPlans,
    ProgressPhotos,
    Videos,
    Reports,
    Other,
}

impl FileCategory {
    pub const ALL: &'static [FileCategory] = &[
        FileCategory::Assessments,
        FileCategory::TherapyPlans,
        FileCategory::ProgressPhotos,
        FileCategory::Videos,
        FileCategory::Reports,
        FileCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FileCategory::Assessments => "Assessments",
            FileCategory::TherapyPlans => "Therapy Plans",
            FileCategory::ProgressPhotos => "Progress Photos",
            FileCategory::Videos => "Videos",
            FileCategory::Reports => "Reports",
            FileCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    pub id: RecordId,
    pub patient_room: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
    pub due_time: NaiveTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    #[serde(rename = "STAT")]
    Stat,
    Urgent,
    Routine,
}

impl Priority {
    pub const ALL: &'static [Priority] = &[Priority::Stat, Priority::Urgent, Priority::Routine];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Stat => "STAT",
            Priority::Urgent => "Urgent",
            Priority::Routine => "Routine",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: RecordId,
    pub sender: ChatSender,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatSender {
    User,
    Assistant,
}

/// Lookup table that every client-linked record joins against for display.
#[derive(Debug, Clone, Default)]
pub struct ClientDirectory {
    clients: Vec<Client>,
}

impl ClientDirectory {
    pub fn new(clients: Vec<Client>) -> Self {
        ClientDirectory { clients }
    }

    pub fn all(&self) -> &[Client] {
        &self.clients
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn get(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Client, ModelError> {
        if self.clients.is_empty() {
            return Err(ModelError::NoClients);
        }
        self.get(id)
            .ok_or_else(|| ModelError::ClientNotFound(id.to_string()))
    }

    pub fn name_of(&self, id: &str) -> &str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or(UNKNOWN_CLIENT)
    }

    pub fn push(&mut self, client: Client) {
        self.clients.push(client);
    }
}

/// Shift to-do list, owned by the shell and lent to views.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        TaskList { tasks }
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Returns false when no task has that id.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    /// Returns false when no task has that id.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }
}

/// Creation-time prefix plus a short random suffix.
pub fn generate_id() -> RecordId {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("{:x}-{}", Utc::now().timestamp_millis(), suffix)
}

pub fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}

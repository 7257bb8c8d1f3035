use std::sync::Arc;

use crate::notifications::service::NotificationService;
use crate::notifications::types::{CreateNotificationInput, DispatchOutcome, NotificationKind, UserRole};

/// Feed owner for direction-wide notifications. The direction staff share
/// one feed rather than having per-member ones.
pub const DIRECTION_USER_ID: &str = "direction";

/// One method per business event, so call sites never assemble context maps
/// or pick template keys themselves. Every method funnels into
/// [`NotificationService::create_notification`] and returns its outcome.
pub struct NotificationTriggers {
    service: Arc<dyn NotificationService>,
}

impl NotificationTriggers {
    pub fn new(service: Arc<dyn NotificationService>) -> Self {
        Self { service }
    }

    // --- Administrative ---

    pub async fn parent_registered(&self, parent_name: &str, child_count: u32) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::ParentRegistered,
            UserRole::Direction,
            DIRECTION_USER_ID,
        )
        .with_data("parentName", parent_name)
        .with_data("childCount", child_count.to_string());
        self.service.create_notification(input).await
    }

    pub async fn teacher_registered(
        &self,
        teacher_name: &str,
        subjects: &[String],
    ) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::TeacherRegistered,
            UserRole::Direction,
            DIRECTION_USER_ID,
        )
        .with_data("teacherName", teacher_name)
        .with_data("subjects", subjects.join(", "));
        self.service.create_notification(input).await
    }

    pub async fn contract_signed(&self, contract_code: &str, parent_name: &str) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::ContractSigned,
            UserRole::Direction,
            DIRECTION_USER_ID,
        )
        .with_data("contractCode", contract_code)
        .with_data("parentName", parent_name);
        self.service.create_notification(input).await
    }

    pub async fn contract_assigned(
        &self,
        teacher_id: &str,
        contract_code: &str,
        student_name: &str,
    ) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::ContractAssigned,
            UserRole::Teacher,
            teacher_id,
        )
        .with_data("contractCode", contract_code)
        .with_data("studentName", student_name);
        self.service.create_notification(input).await
    }

    pub async fn contract_expiring(&self, contract_code: &str, end_date: &str) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::ContractExpiring,
            UserRole::Direction,
            DIRECTION_USER_ID,
        )
        .with_data("contractCode", contract_code)
        .with_data("endDate", end_date);
        self.service.create_notification(input).await
    }

    // --- Payments ---

    pub async fn payment_due(
        &self,
        parent_id: &str,
        student_name: &str,
        amount: f64,
        due_date: &str,
    ) -> DispatchOutcome {
        let input =
            CreateNotificationInput::new(NotificationKind::PaymentDue, UserRole::Parent, parent_id)
                .with_data("studentName", student_name)
                .with_data("amount", format_amount(amount))
                .with_data("dueDate", due_date);
        self.service.create_notification(input).await
    }

    pub async fn payment_reminder(
        &self,
        parent_id: &str,
        student_name: &str,
        amount: f64,
    ) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::PaymentReminder,
            UserRole::Parent,
            parent_id,
        )
        .with_data("studentName", student_name)
        .with_data("amount", format_amount(amount));
        self.service.create_notification(input).await
    }

    pub async fn payment_confirmed(&self, parent_id: &str, amount: f64) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::PaymentConfirmed,
            UserRole::Parent,
            parent_id,
        )
        .with_data("amount", format_amount(amount));
        self.service.create_notification(input).await
    }

    /// Notifies the direction of an incoming payment. The amount rides in
    /// the context so the rule's minimum-amount gate can see it.
    pub async fn payment_received(&self, parent_name: &str, amount: f64) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::PaymentReceived,
            UserRole::Direction,
            DIRECTION_USER_ID,
        )
        .with_data("parentName", parent_name)
        .with_data("amount", format_amount(amount));
        self.service.create_notification(input).await
    }

    pub async fn payment_overdue(
        &self,
        parent_id: &str,
        student_name: &str,
        amount: f64,
        days_late: u32,
    ) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::PaymentOverdue,
            UserRole::Parent,
            parent_id,
        )
        .with_data("studentName", student_name)
        .with_data("amount", format_amount(amount))
        .with_data("daysLate", days_late.to_string());
        self.service.create_notification(input).await
    }

    pub async fn salary_paid(&self, teacher_id: &str, amount: f64, period: &str) -> DispatchOutcome {
        let input =
            CreateNotificationInput::new(NotificationKind::SalaryPaid, UserRole::Teacher, teacher_id)
                .with_data("amount", format_amount(amount))
                .with_data("period", period);
        self.service.create_notification(input).await
    }

    // --- Schedule ---

    pub async fn session_reminder(
        &self,
        teacher_id: &str,
        student_name: &str,
        date: &str,
        time: &str,
    ) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::SessionReminder,
            UserRole::Teacher,
            teacher_id,
        )
        .with_data("studentName", student_name)
        .with_data("date", date)
        .with_data("time", time);
        self.service.create_notification(input).await
    }

    /// A cancellation concerns both sides, so two notifications go out.
    pub async fn session_cancelled(
        &self,
        teacher_id: &str,
        parent_id: &str,
        student_name: &str,
        date: &str,
    ) -> Vec<DispatchOutcome> {
        let teacher_input = CreateNotificationInput::new(
            NotificationKind::SessionCancelled,
            UserRole::Teacher,
            teacher_id,
        )
        .with_data("studentName", student_name)
        .with_data("date", date);
        let parent_input = CreateNotificationInput::new(
            NotificationKind::SessionCancelled,
            UserRole::Parent,
            parent_id,
        )
        .with_data("studentName", student_name)
        .with_data("date", date);

        vec![
            self.service.create_notification(teacher_input).await,
            self.service.create_notification(parent_input).await,
        ]
    }

    pub async fn session_validated(
        &self,
        teacher_id: &str,
        student_name: &str,
        date: &str,
    ) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::SessionValidated,
            UserRole::Teacher,
            teacher_id,
        )
        .with_data("studentName", student_name)
        .with_data("date", date);
        self.service.create_notification(input).await
    }

    /// Fans one replacement request out to every candidate teacher.
    pub async fn urgent_replacement(
        &self,
        teacher_ids: &[String],
        student_name: &str,
        date: &str,
        time: &str,
    ) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::with_capacity(teacher_ids.len());
        for teacher_id in teacher_ids {
            let input = CreateNotificationInput::new(
                NotificationKind::UrgentReplacement,
                UserRole::Teacher,
                teacher_id.as_str(),
            )
            .with_data("studentName", student_name)
            .with_data("date", date)
            .with_data("time", time);
            outcomes.push(self.service.create_notification(input).await);
        }
        outcomes
    }

    pub async fn schedule_changed(
        &self,
        teacher_id: &str,
        parent_id: &str,
        student_name: &str,
    ) -> Vec<DispatchOutcome> {
        let teacher_input = CreateNotificationInput::new(
            NotificationKind::ScheduleChanged,
            UserRole::Teacher,
            teacher_id,
        )
        .with_data("studentName", student_name);
        let parent_input = CreateNotificationInput::new(
            NotificationKind::ScheduleChanged,
            UserRole::Parent,
            parent_id,
        )
        .with_data("studentName", student_name);

        vec![
            self.service.create_notification(teacher_input).await,
            self.service.create_notification(parent_input).await,
        ]
    }

    // --- Academic ---

    /// A deposited bulletin concerns the direction and the student's
    /// assigned teachers.
    pub async fn bulletin_uploaded(
        &self,
        teacher_ids: &[String],
        student_name: &str,
        period: &str,
    ) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::with_capacity(teacher_ids.len() + 1);

        let direction_input = CreateNotificationInput::new(
            NotificationKind::BulletinUploaded,
            UserRole::Direction,
            DIRECTION_USER_ID,
        )
        .with_data("studentName", student_name)
        .with_data("period", period);
        outcomes.push(self.service.create_notification(direction_input).await);

        for teacher_id in teacher_ids {
            let input = CreateNotificationInput::new(
                NotificationKind::BulletinUploaded,
                UserRole::Teacher,
                teacher_id.as_str(),
            )
            .with_data("studentName", student_name)
            .with_data("period", period);
            outcomes.push(self.service.create_notification(input).await);
        }
        outcomes
    }

    pub async fn bulletin_available(
        &self,
        parent_id: &str,
        student_name: &str,
        period: &str,
    ) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::BulletinAvailable,
            UserRole::Parent,
            parent_id,
        )
        .with_data("studentName", student_name)
        .with_data("period", period);
        self.service.create_notification(input).await
    }

    pub async fn grade_published(
        &self,
        parent_id: &str,
        student_name: &str,
        subject: &str,
        grade: &str,
    ) -> DispatchOutcome {
        let input = CreateNotificationInput::new(
            NotificationKind::GradePublished,
            UserRole::Parent,
            parent_id,
        )
        .with_data("studentName", student_name)
        .with_data("subject", subject)
        .with_data("grade", grade);
        self.service.create_notification(input).await
    }
}

/// Renders amounts the way the templates expect: no trailing `.0` on whole
/// CFA franc values.
fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}

use std::sync::Arc;

use crate::{
    domain::{
        normalize_notes,
        plan::{self, parse_iso_date},
        validation::validate_payment_amount,
        NewPayment, Payment, RecordPaymentRequest,
    },
    error::{AppError, Result},
    repository::{MemberRepository, PaymentRepository},
};

pub struct PaymentService {
    repo: Arc<dyn PaymentRepository>,
    members: Arc<dyn MemberRepository>,
}

impl PaymentService {
    pub fn new(repo: Arc<dyn PaymentRepository>, members: Arc<dyn MemberRepository>) -> Self {
        Self { repo, members }
    }

    pub async fn record_payment(&self, member_id: i64, request: RecordPaymentRequest) -> Result<Payment> {
        let mut errors = validate_payment_amount(request.amount);

        let date = match request.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(value) => match parse_iso_date(value) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push("Payment date must be a valid ISO date (YYYY-MM-DD).".to_string());
                    None
                }
            },
            None => Some(plan::today()),
        };

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        if self.members.find_by_id(member_id).await?.is_none() {
            return Err(AppError::NotFound("Member not found".to_string()));
        }

        let payment = self.repo
            .create(NewPayment {
                member_id,
                amount: request.amount,
                date: date.unwrap_or_else(plan::today),
                method: request.method,
                notes: normalize_notes(request.notes),
            })
            .await?;

        tracing::info!(
            "Recorded {} payment of {:.2} for member {}",
            payment.method.as_str(),
            payment.amount,
            member_id
        );
        Ok(payment)
    }

    /// Newest first.
    pub async fn list_for_member(&self, member_id: i64) -> Result<Vec<Payment>> {
        self.repo.find_by_member(member_id).await
    }
}

//! Create/edit modals for clients, loans and deposits.
//!
//! # Design
//! `FormModal<S>` owns the lifecycle every modal shares:
//!
//! ```text
//! Closed -> LoadingReferences -> [LoadingExisting] -> Ready -> Submitting -> Closed
//!                 \                     \                          \
//!                  `-> LoadFailed        `-> LoadFailed             `-> Ready (error shown)
//! ```
//!
//! The entity-specific parts (defaults, lookups, validation, which
//! endpoints to call) live behind `FormSpec`. A successful submit closes
//! the modal and returns the `Invalidation` the owning page has to reload;
//! the modal never touches page state itself.

mod client;
mod deposit;
mod loan;

use std::fmt;

use thiserror::Error;

use crate::api::BankApi;
use crate::error::ApiError;
use crate::fetch::Invalidation;
use crate::message::error_message;
use crate::transport::Transport;

pub use client::{ClientFields, ClientForm, ClientFormSpec, ClientReferences};
pub use deposit::{deposit_type_options, DepositFields, DepositForm, DepositFormSpec};
pub use loan::{LoanFields, LoanForm, LoanFormSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Closed,
    LoadingReferences,
    LoadingExisting,
    Ready,
    Submitting,
    /// Lookups or the edited record could not be loaded. Submission stays
    /// refused until the modal is reopened.
    LoadFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<K> {
    Create,
    Edit(K),
}

/// Local checks run before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name too short")]
    NameTooShort,
    #[error("Age must be between 0 and 150")]
    AgeOutOfRange,
    #[error("Select a job")]
    MissingJob,
    #[error("Select education")]
    MissingEducation,
    #[error("Select marital status")]
    MissingMaritalStatus,
    #[error("Select deposit type")]
    MissingDepositType,
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("form is not ready for submission")]
    NotReady,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Entity-specific half of a modal.
pub trait FormSpec {
    /// What an edit points at.
    type Key: Copy + fmt::Debug;
    type Fields: Clone + fmt::Debug;
    type References: Default + fmt::Debug;

    const ENTITY: &'static str;

    fn defaults(&self) -> Self::Fields;

    fn load_references<T: Transport>(&self, api: &BankApi<T>) -> Result<Self::References, ApiError>;

    /// Read the authoritative record for `key` and turn it into editable
    /// fields.
    fn load_existing<T: Transport>(
        &self,
        api: &BankApi<T>,
        key: Self::Key,
    ) -> Result<Self::Fields, ApiError>;

    fn validate(&self, fields: &Self::Fields) -> Result<(), ValidationError>;

    fn create<T: Transport>(&self, api: &BankApi<T>, fields: &Self::Fields) -> Result<(), ApiError>;

    fn update<T: Transport>(
        &self,
        api: &BankApi<T>,
        key: Self::Key,
        fields: &Self::Fields,
    ) -> Result<(), ApiError>;

    fn invalidation(&self, mode: FormMode<Self::Key>) -> Invalidation;
}

#[derive(Debug)]
pub struct FormModal<S: FormSpec> {
    spec: S,
    phase: FormPhase,
    mode: FormMode<S::Key>,
    fields: S::Fields,
    references: S::References,
    error: Option<String>,
}

impl<S: FormSpec> FormModal<S> {
    pub fn new(spec: S) -> Self {
        let fields = spec.defaults();
        Self {
            spec,
            phase: FormPhase::Closed,
            mode: FormMode::Create,
            fields,
            references: S::References::default(),
            error: None,
        }
    }

    pub fn spec(&self) -> &S {
        &self.spec
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn mode(&self) -> FormMode<S::Key> {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    /// The submit control is disabled while a request is outstanding.
    pub fn can_submit(&self) -> bool {
        self.phase == FormPhase::Ready
    }

    pub fn fields(&self) -> &S::Fields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut S::Fields {
        &mut self.fields
    }

    pub fn references(&self) -> &S::References {
        &self.references
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn open_create<T: Transport>(&mut self, api: &BankApi<T>) {
        self.mode = FormMode::Create;
        self.fields = self.spec.defaults();
        self.error = None;
        self.transition(FormPhase::LoadingReferences);
        if self.load_references(api) {
            self.transition(FormPhase::Ready);
        }
    }

    pub fn open_edit<T: Transport>(&mut self, api: &BankApi<T>, key: S::Key) {
        self.mode = FormMode::Edit(key);
        self.fields = self.spec.defaults();
        self.error = None;
        self.transition(FormPhase::LoadingReferences);
        if !self.load_references(api) {
            return;
        }

        self.transition(FormPhase::LoadingExisting);
        match self.spec.load_existing(api, key) {
            Ok(fields) => {
                self.fields = fields;
                self.transition(FormPhase::Ready);
            }
            Err(e) => {
                tracing::error!(entity = S::ENTITY, ?key, error = %e, "failed to load record for editing");
                self.error = Some(format!("Failed to load {}: {}", S::ENTITY, error_message(&e)));
                self.transition(FormPhase::LoadFailed);
            }
        }
    }

    /// Validate, then create or update. On success the modal closes and the
    /// caller gets the aggregate to reload; on failure it stays open with
    /// the message set.
    pub fn submit<T: Transport>(&mut self, api: &BankApi<T>) -> Result<Invalidation, FormError> {
        if self.phase != FormPhase::Ready {
            return Err(FormError::NotReady);
        }
        self.error = None;

        if let Err(invalid) = self.spec.validate(&self.fields) {
            tracing::debug!(entity = S::ENTITY, reason = %invalid, "validation failed");
            self.error = Some(invalid.to_string());
            return Err(invalid.into());
        }

        self.transition(FormPhase::Submitting);
        let result = match self.mode {
            FormMode::Create => self.spec.create(api, &self.fields),
            FormMode::Edit(key) => self.spec.update(api, key, &self.fields),
        };

        match result {
            Ok(()) => {
                let invalidation = self.spec.invalidation(self.mode);
                tracing::info!(entity = S::ENTITY, mode = ?self.mode, "saved");
                self.close();
                Ok(invalidation)
            }
            Err(e) => {
                tracing::error!(entity = S::ENTITY, error = %e, "save failed");
                self.error = Some(error_message(&e));
                self.transition(FormPhase::Ready);
                Err(e.into())
            }
        }
    }

    pub fn close(&mut self) {
        self.error = None;
        self.transition(FormPhase::Closed);
    }

    fn load_references<T: Transport>(&mut self, api: &BankApi<T>) -> bool {
        match self.spec.load_references(api) {
            Ok(references) => {
                self.references = references;
                true
            }
            Err(e) => {
                tracing::error!(entity = S::ENTITY, error = %e, "failed to load references");
                self.error = Some(format!("Failed to load references: {}", error_message(&e)));
                self.transition(FormPhase::LoadFailed);
                false
            }
        }
    }

    fn transition(&mut self, next: FormPhase) {
        tracing::trace!(entity = S::ENTITY, from = ?self.phase, to = ?next, "form phase");
        self.phase = next;
    }
}

/// Entry of a select input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: i64,
    pub label: String,
}

pub(crate) fn non_negative(value: f64, field: &'static str) -> Result<(), ValidationError> {
    if value.is_nan() {
        Err(ValidationError::NotANumber(field))
    } else if value < 0.0 {
        Err(ValidationError::Negative(field))
    } else {
        Ok(())
    }
}

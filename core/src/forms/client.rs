use crate::api::BankApi;
use crate::error::ApiError;
use crate::fetch::Invalidation;
use crate::patch::Patch;
use crate::transport::Transport;
use crate::types::{
    ClientCreate, ClientDetail, ClientId, ClientUpdate, EducationLevel, Job, MaritalStatus,
    ReferenceId,
};

use super::{FormModal, FormMode, FormSpec, SelectOption, ValidationError};

pub type ClientForm = FormModal<ClientFormSpec>;

const MIN_NAME_LEN: usize = 2;
const MAX_AGE: u32 = 150;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientFields {
    pub full_name: String,
    pub age: u32,
    pub is_bankrupt: bool,
    /// 0 means nothing selected.
    pub job_id: ReferenceId,
    pub education_level_id: ReferenceId,
    pub marital_status_id: ReferenceId,
}

impl Default for ClientFields {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            age: 18,
            is_bankrupt: false,
            job_id: 0,
            education_level_id: 0,
            marital_status_id: 0,
        }
    }
}

impl From<ClientDetail> for ClientFields {
    fn from(detail: ClientDetail) -> Self {
        Self {
            full_name: detail.full_name,
            age: detail.age,
            is_bankrupt: detail.is_bankrupt,
            job_id: detail.job.id,
            education_level_id: detail.education_level.id,
            marital_status_id: detail.marital_status.id,
        }
    }
}

impl ClientFields {
    fn to_create(&self) -> ClientCreate {
        ClientCreate {
            full_name: self.full_name.trim().to_string(),
            age: self.age,
            is_bankrupt: self.is_bankrupt,
            job_id: self.job_id,
            education_level_id: self.education_level_id,
            marital_status_id: self.marital_status_id,
        }
    }

    fn to_update(&self) -> ClientUpdate {
        ClientUpdate {
            full_name: Patch::Set(self.full_name.trim().to_string()),
            age: Patch::Set(self.age),
            is_bankrupt: Patch::Set(self.is_bankrupt),
            job_id: Patch::Set(self.job_id),
            education_level_id: Patch::Set(self.education_level_id),
            marital_status_id: Patch::Set(self.marital_status_id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientReferences {
    pub jobs: Vec<Job>,
    pub education_levels: Vec<EducationLevel>,
    pub marital_statuses: Vec<MaritalStatus>,
}

impl ClientReferences {
    pub fn job_options(&self) -> Vec<SelectOption> {
        self.jobs
            .iter()
            .map(|job| SelectOption {
                value: job.id,
                label: format!("{} ({}₽)", job.name, job.salary),
            })
            .collect()
    }

    pub fn education_options(&self) -> Vec<SelectOption> {
        self.education_levels
            .iter()
            .map(|level| SelectOption {
                value: level.id,
                label: level.name.clone(),
            })
            .collect()
    }

    pub fn marital_status_options(&self) -> Vec<SelectOption> {
        self.marital_statuses
            .iter()
            .map(|status| SelectOption {
                value: status.id,
                label: status.name.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientFormSpec;

impl FormSpec for ClientFormSpec {
    type Key = ClientId;
    type Fields = ClientFields;
    type References = ClientReferences;

    const ENTITY: &'static str = "client";

    fn defaults(&self) -> ClientFields {
        ClientFields::default()
    }

    fn load_references<T: Transport>(&self, api: &BankApi<T>) -> Result<ClientReferences, ApiError> {
        Ok(ClientReferences {
            jobs: api.list_jobs()?,
            education_levels: api.list_education_levels()?,
            marital_statuses: api.list_marital_statuses()?,
        })
    }

    fn load_existing<T: Transport>(
        &self,
        api: &BankApi<T>,
        key: ClientId,
    ) -> Result<ClientFields, ApiError> {
        api.get_client(key).map(ClientFields::from)
    }

    fn validate(&self, fields: &ClientFields) -> Result<(), ValidationError> {
        if fields.full_name.trim().chars().count() < MIN_NAME_LEN {
            return Err(ValidationError::NameTooShort);
        }
        if fields.age > MAX_AGE {
            return Err(ValidationError::AgeOutOfRange);
        }
        if fields.job_id == 0 {
            return Err(ValidationError::MissingJob);
        }
        if fields.education_level_id == 0 {
            return Err(ValidationError::MissingEducation);
        }
        if fields.marital_status_id == 0 {
            return Err(ValidationError::MissingMaritalStatus);
        }
        Ok(())
    }

    fn create<T: Transport>(&self, api: &BankApi<T>, fields: &ClientFields) -> Result<(), ApiError> {
        api.create_client(&fields.to_create()).map(drop)
    }

    fn update<T: Transport>(
        &self,
        api: &BankApi<T>,
        key: ClientId,
        fields: &ClientFields,
    ) -> Result<(), ApiError> {
        api.update_client(key, &fields.to_update()).map(drop)
    }

    fn invalidation(&self, mode: FormMode<ClientId>) -> Invalidation {
        match mode {
            FormMode::Create => Invalidation::ClientList,
            FormMode::Edit(id) => Invalidation::ClientFull(id),
        }
    }
}

use chrono::{Local, Months, NaiveDate};

use crate::api::BankApi;
use crate::error::ApiError;
use crate::fetch::Invalidation;
use crate::patch::Patch;
use crate::transport::Transport;
use crate::types::{ClientId, Deposit, DepositCreate, DepositId, DepositType, DepositUpdate, ReferenceId};

use super::{non_negative, FormModal, FormMode, FormSpec, SelectOption, ValidationError};

pub type DepositForm = FormModal<DepositFormSpec>;

const DEFAULT_AMOUNT: f64 = 50_000.0;
const DEFAULT_RATE: f64 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DepositFields {
    /// 0 means nothing selected.
    pub type_id: ReferenceId,
    pub amount: f64,
    pub interest_rate: f64,
    pub final_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DepositFields {
    fn to_create(&self, client_id: ClientId) -> DepositCreate {
        DepositCreate {
            client_id,
            type_id: self.type_id,
            amount: self.amount,
            interest_rate: self.interest_rate,
            final_amount: self.final_amount,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    fn to_update(&self) -> DepositUpdate {
        DepositUpdate {
            type_id: Patch::Set(self.type_id),
            amount: Patch::Set(self.amount),
            interest_rate: Patch::Set(self.interest_rate),
            final_amount: Patch::Set(self.final_amount),
            start_date: Patch::Set(self.start_date),
            end_date: Patch::Set(self.end_date),
        }
    }
}

impl From<&Deposit> for DepositFields {
    fn from(deposit: &Deposit) -> Self {
        Self {
            type_id: deposit.deposit_type.id,
            amount: deposit.amount,
            interest_rate: deposit.interest_rate,
            final_amount: deposit.final_amount,
            start_date: deposit.start_date,
            end_date: deposit.end_date,
        }
    }
}

pub fn deposit_type_options(types: &[DepositType]) -> Vec<SelectOption> {
    types
        .iter()
        .map(|t| SelectOption {
            value: t.id,
            label: t.name.clone(),
        })
        .collect()
}

/// Deposit modal bound to one client.
#[derive(Debug, Clone)]
pub struct DepositFormSpec {
    client_id: ClientId,
    today: NaiveDate,
}

impl DepositFormSpec {
    pub fn new(client_id: ClientId) -> Self {
        Self::with_today(client_id, Local::now().date_naive())
    }

    pub fn with_today(client_id: ClientId, today: NaiveDate) -> Self {
        Self { client_id, today }
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }
}

impl FormSpec for DepositFormSpec {
    type Key = DepositId;
    type Fields = DepositFields;
    type References = Vec<DepositType>;

    const ENTITY: &'static str = "deposit";

    fn defaults(&self) -> DepositFields {
        DepositFields {
            type_id: 0,
            amount: DEFAULT_AMOUNT,
            interest_rate: DEFAULT_RATE,
            final_amount: DEFAULT_AMOUNT,
            start_date: self.today,
            end_date: self
                .today
                .checked_add_months(Months::new(12))
                .unwrap_or(self.today),
        }
    }

    fn load_references<T: Transport>(&self, api: &BankApi<T>) -> Result<Vec<DepositType>, ApiError> {
        api.list_deposit_types()
    }

    /// Deposits are read back through the owner's full view.
    fn load_existing<T: Transport>(
        &self,
        api: &BankApi<T>,
        key: DepositId,
    ) -> Result<DepositFields, ApiError> {
        let full = api.get_client_full(self.client_id)?;
        full.deposit(key)
            .map(DepositFields::from)
            .ok_or_else(|| ApiError::NotFound {
                body: "Deposit not found".to_string(),
            })
    }

    fn validate(&self, fields: &DepositFields) -> Result<(), ValidationError> {
        if fields.type_id == 0 {
            return Err(ValidationError::MissingDepositType);
        }
        non_negative(fields.amount, "Amount")?;
        non_negative(fields.interest_rate, "Interest rate")?;
        non_negative(fields.final_amount, "Final amount")?;
        Ok(())
    }

    fn create<T: Transport>(&self, api: &BankApi<T>, fields: &DepositFields) -> Result<(), ApiError> {
        api.create_deposit(&fields.to_create(self.client_id)).map(drop)
    }

    fn update<T: Transport>(
        &self,
        api: &BankApi<T>,
        key: DepositId,
        fields: &DepositFields,
    ) -> Result<(), ApiError> {
        api.update_deposit(key, &fields.to_update()).map(drop)
    }

    fn invalidation(&self, _mode: FormMode<DepositId>) -> Invalidation {
        Invalidation::ClientFull(self.client_id)
    }
}

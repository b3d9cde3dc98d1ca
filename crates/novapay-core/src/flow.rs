use crate::confirmation::{PAYMENT_PREFIX, TRANSFER_PREFIX};
use crate::error::NovaPayError;
use crate::money::Money;
use crate::remote::RemoteOperation;
use crate::task::PendingTask;
use crate::types::{PaymentOrder, Receipt, ServiceKind, TransferOrder};
use crate::validation::{
    is_blank, FieldErrors, AMOUNT_BELOW_MINIMUM, INVALID_AMOUNT, REQUIRED,
};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const CLABE_MAX_LEN: usize = 18;
pub const CLABE_TOO_LONG: &str = "Maximo 18 digitos";
pub const UNKNOWN_SERVICE: &str = "Servicio invalido";
pub const MIN_AMOUNT: Money = Money::from_pesos(1);

/// Stages of a transfer or payment overlay. Strictly forward once submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStage {
    Form,
    Processing,
    Success,
}

impl FlowStage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Processing => "processing",
            Self::Success => "success",
        }
    }
}

/// What distinguishes a transfer overlay from a payment overlay.
pub trait FlowKind: Send + Sync + 'static {
    type Form: Default + Clone + std::fmt::Debug + Send;
    type Order: Clone + Send + 'static;

    /// Folio prefix of the receipts this flow produces.
    const PREFIX: &'static str;
    const TITLE: &'static str;

    fn validate(form: &Self::Form) -> Result<Self::Order, FieldErrors>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Transfer;

#[derive(Debug, Clone, Copy, Default)]
pub struct Payment;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferForm {
    pub beneficiary: String,
    pub clabe: String,
    pub amount: String,
    /// Optional free text.
    pub concept: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentForm {
    /// Catalog id, see [`ServiceKind::id`].
    pub service: String,
    pub reference: String,
    pub amount: String,
}

fn validate_amount(raw: &str, errors: &mut FieldErrors) -> Money {
    if is_blank(raw) {
        errors.insert("amount", REQUIRED);
        return Money::ZERO;
    }
    match Money::parse_pesos(raw) {
        Some(amount) if amount >= MIN_AMOUNT => amount,
        Some(_) => {
            errors.insert("amount", AMOUNT_BELOW_MINIMUM);
            Money::ZERO
        }
        None => {
            errors.insert("amount", INVALID_AMOUNT);
            Money::ZERO
        }
    }
}

impl FlowKind for Transfer {
    type Form = TransferForm;
    type Order = TransferOrder;

    const PREFIX: &'static str = TRANSFER_PREFIX;
    const TITLE: &'static str = "Transferencia SPEI";

    fn validate(form: &TransferForm) -> Result<TransferOrder, FieldErrors> {
        let mut errors = FieldErrors::new();
        if is_blank(&form.beneficiary) {
            errors.insert("beneficiary", REQUIRED);
        }
        let clabe = form.clabe.trim();
        if clabe.is_empty() {
            errors.insert("clabe", REQUIRED);
        } else if clabe.chars().count() > CLABE_MAX_LEN {
            errors.insert("clabe", CLABE_TOO_LONG);
        }
        let amount = validate_amount(&form.amount, &mut errors);
        errors.into_result()?;

        let concept = form.concept.trim();
        Ok(TransferOrder {
            beneficiary: form.beneficiary.trim().to_string(),
            clabe: clabe.to_string(),
            amount,
            concept: (!concept.is_empty()).then(|| concept.to_string()),
        })
    }
}

impl FlowKind for Payment {
    type Form = PaymentForm;
    type Order = PaymentOrder;

    const PREFIX: &'static str = PAYMENT_PREFIX;
    const TITLE: &'static str = "Pagar Servicio";

    fn validate(form: &PaymentForm) -> Result<PaymentOrder, FieldErrors> {
        let mut errors = FieldErrors::new();
        let service = if is_blank(&form.service) {
            errors.insert("service", REQUIRED);
            None
        } else {
            let found = ServiceKind::from_id(form.service.trim());
            if found.is_none() {
                errors.insert("service", UNKNOWN_SERVICE);
            }
            found
        };
        if is_blank(&form.reference) {
            errors.insert("reference", REQUIRED);
        }
        let amount = validate_amount(&form.amount, &mut errors);
        errors.into_result()?;

        let service = service.ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.insert("service", UNKNOWN_SERVICE);
            errors
        })?;
        Ok(PaymentOrder {
            service,
            reference: form.reference.trim().to_string(),
            amount,
        })
    }
}

pub type FlowOperation<K> =
    Arc<dyn RemoteOperation<Request = <K as FlowKind>::Order, Response = Receipt>>;

/// Overlay flow: form, then simulated processing, then receipt.
///
/// Submitting spawns the remote call as a task owned by the flow. Closing or dropping the
/// flow aborts that task and discards everything entered.
pub struct ModalFlow<K: FlowKind> {
    trace_id: String,
    stage: FlowStage,
    form: K::Form,
    errors: FieldErrors,
    last_error: Option<String>,
    pending: Option<PendingTask<Receipt>>,
    receipt: Option<Receipt>,
    operation: FlowOperation<K>,
    _kind: PhantomData<K>,
}

pub type TransferFlow = ModalFlow<Transfer>;
pub type PaymentFlow = ModalFlow<Payment>;

impl<K: FlowKind> std::fmt::Debug for ModalFlow<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalFlow")
            .field("title", &K::TITLE)
            .field("trace_id", &self.trace_id)
            .field("stage", &self.stage)
            .field("form", &self.form)
            .field("receipt", &self.receipt)
            .finish()
    }
}

impl<K: FlowKind> ModalFlow<K> {
    pub fn new(operation: FlowOperation<K>) -> Self {
        let trace_id = Uuid::new_v4().to_string();
        debug!(flow = K::TITLE, trace_id = %trace_id, "flow opened");
        Self {
            trace_id,
            stage: FlowStage::Form,
            form: K::Form::default(),
            errors: FieldErrors::new(),
            last_error: None,
            pending: None,
            receipt: None,
            operation,
            _kind: PhantomData,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn title(&self) -> &'static str {
        K::TITLE
    }

    pub fn stage(&self) -> FlowStage {
        self.stage
    }

    pub fn form(&self) -> &K::Form {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Message of the last failed remote call, if the flow fell back to the form.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    /// Editable form; only available before submission.
    pub fn form_mut(&mut self) -> Result<&mut K::Form, NovaPayError> {
        self.require(FlowStage::Form)?;
        self.errors.clear();
        Ok(&mut self.form)
    }

    /// Validates the form and starts processing.
    pub fn submit(&mut self) -> Result<(), NovaPayError> {
        self.require(FlowStage::Form)?;
        let order = match K::validate(&self.form) {
            Ok(order) => order,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(NovaPayError::Validation(errors));
            }
        };

        self.errors.clear();
        self.last_error = None;
        let operation = Arc::clone(&self.operation);
        self.pending = Some(PendingTask::spawn(self.operation.name(), async move {
            operation.execute(order).await
        }));
        self.stage = FlowStage::Processing;
        info!(flow = K::TITLE, trace_id = %self.trace_id, "flow submitted");
        Ok(())
    }

    /// True once the processing task has produced a result that `finish` can collect.
    pub fn is_ready(&self) -> bool {
        self.pending
            .as_ref()
            .map(PendingTask::is_finished)
            .unwrap_or(false)
    }

    /// Waits for processing to end and moves to the receipt.
    ///
    /// If the remote call fails the flow returns to the form with the entered data intact.
    pub async fn finish(&mut self) -> Result<&Receipt, NovaPayError> {
        self.require(FlowStage::Processing)?;
        let pending = self.pending.take().ok_or_else(|| {
            NovaPayError::InvalidTransition("processing without a pending task".to_string())
        })?;

        match pending.join().await {
            Ok(receipt) => {
                info!(
                    flow = K::TITLE,
                    trace_id = %self.trace_id,
                    folio = %receipt.folio,
                    "flow completed"
                );
                self.stage = FlowStage::Success;
                Ok(self.receipt.insert(receipt))
            }
            Err(err) => {
                warn!(flow = K::TITLE, trace_id = %self.trace_id, error = %err, "flow failed");
                self.stage = FlowStage::Form;
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Submit and wait in one step.
    pub async fn submit_and_finish(&mut self) -> Result<&Receipt, NovaPayError> {
        self.submit()?;
        self.finish().await
    }

    /// Discards the flow at whatever stage it is in.
    pub fn close(self) {
        debug!(flow = K::TITLE, trace_id = %self.trace_id, stage = self.stage.name(), "flow closed");
    }

    fn require(&self, expected: FlowStage) -> Result<(), NovaPayError> {
        if self.stage != expected {
            return Err(NovaPayError::stage_violation(
                expected.name(),
                self.stage.name(),
            ));
        }
        Ok(())
    }
}

//! Drives one add-transaction submission from form input to storage.

use tracing::{debug, info, warn};

use crate::{
    currency::CurrencyFormatter,
    ledger::{LedgerState, Transaction, TransactionKind},
    render::{render_summary, render_transaction, RenderSurface},
    storage::{KeyValueStore, LedgerStore},
    validation::{coerce_amount, validate, InputField, ValidationError},
};

/// Where a submission currently is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    Validating,
    Rejected,
    Accepted,
    Persisting,
}

/// Whether additions still reach the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    Durable,
    /// Storage failed; the session keeps working without saving.
    InMemoryOnly,
}

/// Raw values read from the add-transaction form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub kind: Option<TransactionKind>,
    pub description: String,
    pub amount: String,
}

impl Submission {
    pub fn new(
        kind: Option<TransactionKind>,
        description: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            amount: amount.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Neither income nor expense was selected.
    MissingKind,
    Invalid(ValidationError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted {
        transaction: Transaction,
        persisted: bool,
    },
    Rejected(Rejection),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

/// How the session started, for callers that want to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupReport {
    Restored { transactions: usize },
    Fresh,
    /// A stored value could not be read and was moved to `quarantined`.
    Recovered { quarantined: Option<String> },
    StorageUnavailable,
}

pub struct TransactionController<S, R> {
    ledger: LedgerState,
    store: LedgerStore<S>,
    surface: R,
    formatter: CurrencyFormatter,
    phase: ControllerPhase,
    persistence: PersistenceMode,
}

impl<S: KeyValueStore, R: RenderSurface> TransactionController<S, R> {
    /// Restores the stored ledger (or starts empty) and replays it onto `surface`.
    pub fn start(
        mut store: LedgerStore<S>,
        surface: R,
        formatter: CurrencyFormatter,
    ) -> (Self, StartupReport) {
        let mut persistence = PersistenceMode::Durable;
        let (ledger, report) = match store.load() {
            Ok(Some(ledger)) => {
                let transactions = ledger.transaction_count();
                (ledger, StartupReport::Restored { transactions })
            }
            Ok(None) => (LedgerState::new(), StartupReport::Fresh),
            Err(err) if err.is_corrupt() => {
                warn!(key = store.key(), error = %err, "stored ledger unreadable, starting fresh");
                let quarantined = match store.quarantine() {
                    Ok(target) => target,
                    Err(move_err) => {
                        warn!(error = %move_err, "could not move ledger aside, not saving this session");
                        persistence = PersistenceMode::InMemoryOnly;
                        None
                    }
                };
                (LedgerState::new(), StartupReport::Recovered { quarantined })
            }
            Err(err) => {
                warn!(key = store.key(), error = %err, "storage unavailable, not saving this session");
                persistence = PersistenceMode::InMemoryOnly;
                (LedgerState::new(), StartupReport::StorageUnavailable)
            }
        };

        let mut controller = Self {
            ledger,
            store,
            surface,
            formatter,
            phase: ControllerPhase::Idle,
            persistence,
        };
        controller.display_all();
        info!(?report, "ledger session started");
        (controller, report)
    }

    /// Renders the totals and every stored transaction.
    fn display_all(&mut self) {
        render_summary(&self.ledger, &self.formatter, &mut self.surface);
        for kind in TransactionKind::ALL {
            for transaction in self.ledger.entries(kind) {
                render_transaction(kind, transaction, &self.formatter, &mut self.surface);
            }
        }
    }

    pub fn submit(&mut self, submission: &Submission) -> SubmitOutcome {
        self.enter(ControllerPhase::Validating);

        let Some(kind) = submission.kind else {
            warn!("submission without a transaction kind");
            return self.reject(Rejection::MissingKind);
        };

        let amount = coerce_amount(&submission.amount);
        if let Err(err) = validate(&submission.description, amount) {
            self.surface.show_error(err.field(), err.hint());
            return self.reject(Rejection::Invalid(err));
        }
        if !self.ledger.can_apply(kind, amount) {
            warn!(%kind, amount, "amount would overflow the ledger totals");
            let err = ValidationError::InvalidAmount;
            self.surface.show_error(err.field(), err.hint());
            return self.reject(Rejection::Invalid(err));
        }

        self.enter(ControllerPhase::Accepted);
        let transaction = self
            .ledger
            .record(kind, submission.description.trim(), amount)
            .clone();
        render_summary(&self.ledger, &self.formatter, &mut self.surface);
        render_transaction(kind, &transaction, &self.formatter, &mut self.surface);
        self.surface.reset_form();

        self.enter(ControllerPhase::Persisting);
        let persisted = self.persist();
        self.enter(ControllerPhase::Idle);

        info!(
            %kind,
            no = transaction.sequence_number(),
            amount = transaction.amount(),
            persisted,
            "transaction added"
        );
        SubmitOutcome::Accepted {
            transaction,
            persisted,
        }
    }

    /// Clears the error indicator of a field the user focused.
    pub fn clear_field_error(&mut self, field: InputField) {
        self.surface.clear_error(field);
    }

    fn persist(&mut self) -> bool {
        if self.persistence == PersistenceMode::InMemoryOnly {
            return false;
        }
        match self.store.save(&self.ledger) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "saving ledger failed, continuing in memory only");
                self.persistence = PersistenceMode::InMemoryOnly;
                false
            }
        }
    }

    fn reject(&mut self, rejection: Rejection) -> SubmitOutcome {
        self.enter(ControllerPhase::Rejected);
        self.enter(ControllerPhase::Idle);
        SubmitOutcome::Rejected(rejection)
    }

    fn enter(&mut self, phase: ControllerPhase) {
        debug!(from = ?self.phase, to = ?phase, "controller phase");
        self.phase = phase;
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    pub fn persistence(&self) -> PersistenceMode {
        self.persistence
    }

    pub fn ledger(&self) -> &LedgerState {
        &self.ledger
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn formatter(&self) -> &CurrencyFormatter {
        &self.formatter
    }

    pub fn store(&self) -> &LedgerStore<S> {
        &self.store
    }

    pub fn into_parts(self) -> (LedgerState, LedgerStore<S>, R) {
        (self.ledger, self.store, self.surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render::HtmlPage, storage::MemoryStore};

    fn controller() -> TransactionController<MemoryStore, HtmlPage> {
        let (controller, report) = TransactionController::start(
            LedgerStore::new(MemoryStore::new()),
            HtmlPage::default(),
            CurrencyFormatter::default(),
        );
        assert_eq!(report, StartupReport::Fresh);
        controller
    }

    #[test]
    fn missing_kind_is_rejected_without_mutation() {
        let mut controller = controller();
        let outcome = controller.submit(&Submission::new(None, "Salary", "1000"));
        assert_eq!(outcome, SubmitOutcome::Rejected(Rejection::MissingKind));
        assert!(controller.ledger().is_empty());
        assert_eq!(controller.phase(), ControllerPhase::Idle);
        assert!(controller.store().load().unwrap().is_none());
    }

    #[test]
    fn accepted_submission_trims_description() {
        let mut controller = controller();
        let outcome = controller.submit(&Submission::new(
            Some(TransactionKind::Income),
            "  Salary ",
            " 1000 ",
        ));
        match outcome {
            SubmitOutcome::Accepted {
                transaction,
                persisted,
            } => {
                assert_eq!(transaction.description(), "Salary");
                assert_eq!(transaction.amount(), 1000.0);
                assert!(persisted);
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
        assert_eq!(controller.phase(), ControllerPhase::Idle);
    }

    #[test]
    fn non_numeric_amount_marks_amount_field() {
        let mut controller = controller();
        let outcome = controller.submit(&Submission::new(
            Some(TransactionKind::Expense),
            "Coffee",
            "a lot",
        ));
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected(Rejection::Invalid(ValidationError::InvalidAmount))
        );
        assert!(controller.surface().field(InputField::Amount).has_error);
        controller.clear_field_error(InputField::Amount);
        assert!(!controller.surface().field(InputField::Amount).has_error);
    }
}

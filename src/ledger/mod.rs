//! Ledger collaborator
//!
//! Stores booked transactions and running account balances.
//! The classifier never touches it; the message layer writes here after a
//! reading is accepted. Ships with an in-memory store; a remote spreadsheet
//! or database backend implements the same trait.

use crate::error::CatatError;
use crate::models::{AccountBalance, LedgerRow, ParsedTransaction, Recap, TransactionType};
use crate::Result;
use chrono::{DateTime, Datelike, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Accounts every fresh ledger starts with, all at zero
pub const DEFAULT_ACCOUNTS: &[&str] = &[
    "CASH", "BRI", "BNI", "BCA", "MANDIRI", "DANA", "OVO", "GOPAY", "BRK",
];

/// Trait for ledger persistence
#[async_trait::async_trait]
pub trait Ledger: Send + Sync {
    async fn append(&self, row: LedgerRow) -> Result<()>;

    /// Move money for one accepted transaction and return the balances of
    /// every account it touched. On error no balance has changed.
    async fn apply_balance(&self, parsed: &ParsedTransaction) -> Result<Vec<AccountBalance>>;

    /// Append a row and apply its balance moves as one step. On error
    /// neither the rows nor the balances have changed.
    async fn record(&self, row: LedgerRow) -> Result<Vec<AccountBalance>>;

    async fn balances(&self) -> Result<Vec<AccountBalance>>;
    async fn balance(&self, account: &str) -> Result<i64>;

    async fn recap(
        &self,
        period: &RecapPeriod,
        type_filter: Option<TransactionType>,
    ) -> Result<Recap>;
}

//
// ================= Recap periods =================
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecapPeriod {
    Month { year: i32, month: u32 },
    Year(i32),
}

impl RecapPeriod {
    /// `YYYY-MM` or `YYYY`
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || CatatError::InvalidPeriod(value.to_string());
        let value = value.trim();

        match value.split_once('-') {
            Some((year, month)) if year.len() == 4 && month.len() == 2 => {
                let year = year.parse().map_err(|_| invalid())?;
                let month = month.parse().map_err(|_| invalid())?;
                if !(1..=12).contains(&month) {
                    return Err(invalid());
                }
                Ok(RecapPeriod::Month { year, month })
            }
            None if value.len() == 4 => Ok(RecapPeriod::Year(value.parse().map_err(|_| invalid())?)),
            _ => Err(invalid()),
        }
    }

    pub fn current_month(now: DateTime<Utc>) -> Self {
        RecapPeriod::Month {
            year: now.year(),
            month: now.month(),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        match *self {
            RecapPeriod::Month { year, month } => at.year() == year && at.month() == month,
            RecapPeriod::Year(year) => at.year() == year,
        }
    }
}

impl fmt::Display for RecapPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecapPeriod::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            RecapPeriod::Year(year) => write!(f, "{:04}", year),
        }
    }
}

//
// ================= In-memory ledger =================
//

/// In-memory ledger for development and tests
pub struct InMemoryLedger {
    rows: Arc<RwLock<Vec<LedgerRow>>>,
    /// Kept in creation order, like the rows of a balance sheet
    balances: Arc<RwLock<Vec<AccountBalance>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::with_accounts(DEFAULT_ACCOUNTS)
    }

    pub fn with_accounts(accounts: &[&str]) -> Self {
        let balances = accounts
            .iter()
            .map(|account| AccountBalance {
                account: account.to_uppercase(),
                balance: 0,
            })
            .collect();

        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            balances: Arc::new(RwLock::new(balances)),
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Signed balance changes of one transaction, in the order the accounts
/// are touched
fn moves(
    tx_type: TransactionType,
    source: &str,
    target: Option<&str>,
    amount: u64,
) -> Result<Vec<(String, i64)>> {
    let amount = i64::try_from(amount)
        .map_err(|_| CatatError::Ledger(format!("amount {} out of range", amount)))?;

    Ok(match (tx_type, target) {
        (TransactionType::Transfer, Some(target)) => {
            vec![(source.to_string(), -amount), (target.to_string(), amount)]
        }
        (TransactionType::Income, _) => vec![(source.to_string(), amount)],
        // Expenses, and transfers whose destination is unknown
        _ => vec![(source.to_string(), -amount)],
    })
}

/// Balances after `moves`, computed without touching `balances`.
/// Unknown accounts start at zero.
fn plan(balances: &[AccountBalance], moves: &[(String, i64)]) -> Result<Vec<AccountBalance>> {
    let mut touched: Vec<AccountBalance> = Vec::new();

    for (account, diff) in moves {
        let current = touched
            .iter()
            .chain(balances.iter())
            .find(|b| b.account.eq_ignore_ascii_case(account));

        let (name, balance) = match current {
            Some(b) => (b.account.clone(), b.balance),
            None => (account.to_uppercase(), 0),
        };
        let balance = balance
            .checked_add(*diff)
            .ok_or_else(|| CatatError::Ledger(format!("balance overflow on {}", name)))?;

        match touched.iter_mut().find(|b| b.account == name) {
            Some(entry) => entry.balance = balance,
            None => touched.push(AccountBalance {
                account: name,
                balance,
            }),
        }
    }

    Ok(touched)
}

fn commit(balances: &mut Vec<AccountBalance>, touched: &[AccountBalance]) {
    for update in touched {
        match balances.iter_mut().find(|b| b.account == update.account) {
            Some(entry) => entry.balance = update.balance,
            None => balances.push(update.clone()),
        }
    }
}

#[async_trait::async_trait]
impl Ledger for InMemoryLedger {
    async fn append(&self, row: LedgerRow) -> Result<()> {
        info!(
            row_id = %row.row_id,
            tx_type = %row.tx_type,
            amount = row.amount,
            category = %row.category,
            "Ledger row appended"
        );

        let mut rows = self.rows.write().await;
        rows.push(row);
        Ok(())
    }

    async fn apply_balance(&self, parsed: &ParsedTransaction) -> Result<Vec<AccountBalance>> {
        let amount = parsed
            .amount
            .ok_or_else(|| CatatError::Ledger("transaction has no amount".into()))?;
        let moves = moves(
            parsed.tx_type,
            &parsed.source_account,
            parsed.target_account.as_deref(),
            amount,
        )?;

        let mut balances = self.balances.write().await;
        let touched = plan(&balances, &moves)?;
        commit(&mut balances, &touched);

        Ok(touched)
    }

    async fn record(&self, row: LedgerRow) -> Result<Vec<AccountBalance>> {
        let moves = moves(
            row.tx_type,
            &row.source_account,
            row.target_account.as_deref(),
            row.amount,
        )?;

        // Balances before rows, the only order both locks are taken in
        let mut balances = self.balances.write().await;
        let touched = plan(&balances, &moves)?;
        let mut rows = self.rows.write().await;

        info!(
            row_id = %row.row_id,
            tx_type = %row.tx_type,
            amount = row.amount,
            category = %row.category,
            "Ledger row recorded"
        );

        rows.push(row);
        commit(&mut balances, &touched);

        Ok(touched)
    }

    async fn balances(&self) -> Result<Vec<AccountBalance>> {
        let balances = self.balances.read().await;
        Ok(balances.clone())
    }

    async fn balance(&self, account: &str) -> Result<i64> {
        let balances = self.balances.read().await;
        Ok(balances
            .iter()
            .find(|b| b.account.eq_ignore_ascii_case(account))
            .map(|b| b.balance)
            .unwrap_or(0))
    }

    async fn recap(
        &self,
        period: &RecapPeriod,
        type_filter: Option<TransactionType>,
    ) -> Result<Recap> {
        let rows = self.rows.read().await;

        let matching: Vec<LedgerRow> = rows
            .iter()
            .filter(|row| period.contains(row.recorded_at))
            .filter(|row| type_filter.map_or(true, |ty| row.tx_type == ty))
            .cloned()
            .collect();

        let total = |ty: TransactionType| -> u64 {
            matching
                .iter()
                .filter(|row| row.tx_type == ty)
                .map(|row| row.amount)
                .fold(0u64, u64::saturating_add)
        };

        Ok(Recap {
            period: period.to_string(),
            type_filter,
            total_expense: total(TransactionType::Expense),
            total_income: total(TransactionType::Income),
            total_transfer: total(TransactionType::Transfer),
            rows: matching,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DEFAULT_ACCOUNT, OTHER_CATEGORY};
    use chrono::TimeZone;

    fn parsed(
        tx_type: TransactionType,
        amount: u64,
        source: &str,
        target: Option<&str>,
    ) -> ParsedTransaction {
        ParsedTransaction {
            tx_type,
            amount: Some(amount),
            raw_text: "test".to_string(),
            normalized_description: "test".to_string(),
            category: OTHER_CATEGORY.to_string(),
            subcategory: String::new(),
            source_account: source.to_string(),
            target_account: target.map(str::to_string),
            confidence: 50,
        }
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!(
            RecapPeriod::parse("2025-03").unwrap(),
            RecapPeriod::Month { year: 2025, month: 3 }
        );
        assert_eq!(RecapPeriod::parse("2025").unwrap(), RecapPeriod::Year(2025));
        assert_eq!(RecapPeriod::parse("2025-03").unwrap().to_string(), "2025-03");

        for bad in ["", "2025-13", "25-03", "maret", "2025-3"] {
            assert!(
                matches!(RecapPeriod::parse(bad), Err(CatatError::InvalidPeriod(_))),
                "period: {}",
                bad
            );
        }
    }

    #[tokio::test]
    async fn test_default_accounts_start_at_zero() {
        let ledger = InMemoryLedger::new();
        let balances = ledger.balances().await.unwrap();

        assert_eq!(balances.len(), DEFAULT_ACCOUNTS.len());
        assert!(balances.iter().all(|b| b.balance == 0));
        assert_eq!(ledger.balance("nowhere").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_expense_and_income_move_source() {
        let ledger = InMemoryLedger::new();

        ledger
            .apply_balance(&parsed(TransactionType::Income, 2_000_000, "BCA", None))
            .await
            .unwrap();
        let touched = ledger
            .apply_balance(&parsed(TransactionType::Expense, 35_000, "bca", None))
            .await
            .unwrap();

        assert_eq!(touched, vec![AccountBalance { account: "BCA".into(), balance: 1_965_000 }]);
        assert_eq!(ledger.balance("BCA").await.unwrap(), 1_965_000);
    }

    #[tokio::test]
    async fn test_transfer_moves_between_accounts() {
        let ledger = InMemoryLedger::new();
        let touched = ledger
            .apply_balance(&parsed(TransactionType::Transfer, 100_000, DEFAULT_ACCOUNT, Some("JAGO")))
            .await
            .unwrap();

        assert_eq!(touched[0].balance, -100_000);
        assert_eq!(touched[1], AccountBalance { account: "JAGO".into(), balance: 100_000 });
        assert_eq!(ledger.balances().await.unwrap().last().unwrap().account, "JAGO");

        // Without a destination the transfer only leaves the source
        ledger
            .apply_balance(&parsed(TransactionType::Transfer, 50_000, "JAGO", None))
            .await
            .unwrap();
        assert_eq!(ledger.balance("JAGO").await.unwrap(), 50_000);
    }

    #[test]
    fn test_missing_amount_is_rejected() {
        let ledger = InMemoryLedger::new();
        let mut tx = parsed(TransactionType::Expense, 1, DEFAULT_ACCOUNT, None);
        tx.amount = None;

        let result = tokio_test::block_on(ledger.apply_balance(&tx));
        assert!(matches!(result, Err(CatatError::Ledger(_))));
    }

    #[tokio::test]
    async fn test_failed_transfer_leaves_both_accounts_untouched() {
        let ledger = InMemoryLedger::new();
        ledger
            .apply_balance(&parsed(TransactionType::Income, i64::MAX as u64, "JAGO", None))
            .await
            .unwrap();

        let result = ledger
            .apply_balance(&parsed(TransactionType::Transfer, 1, DEFAULT_ACCOUNT, Some("JAGO")))
            .await;

        assert!(matches!(result, Err(CatatError::Ledger(_))));
        assert_eq!(ledger.balance(DEFAULT_ACCOUNT).await.unwrap(), 0);
        assert_eq!(ledger.balance("JAGO").await.unwrap(), i64::MAX);
    }

    #[tokio::test]
    async fn test_record_writes_row_and_balances_together() {
        let ledger = InMemoryLedger::new();
        let now = Utc::now();
        let row = LedgerRow::from_parsed(
            &parsed(TransactionType::Transfer, 100_000, "BRI", Some("DANA")),
            now,
        )
        .unwrap();

        let touched = ledger.record(row).await.unwrap();
        assert_eq!(touched.len(), 2);
        assert_eq!(ledger.balance("BRI").await.unwrap(), -100_000);
        assert_eq!(ledger.balance("DANA").await.unwrap(), 100_000);

        let recap = ledger.recap(&RecapPeriod::current_month(now), None).await.unwrap();
        assert_eq!(recap.rows.len(), 1);
        assert_eq!(recap.total_transfer, 100_000);
    }

    #[tokio::test]
    async fn test_rejected_record_leaves_no_row() {
        let ledger = InMemoryLedger::new();
        let now = Utc::now();
        let row = LedgerRow::from_parsed(
            &parsed(TransactionType::Expense, u64::MAX, DEFAULT_ACCOUNT, None),
            now,
        )
        .unwrap();

        assert!(matches!(ledger.record(row).await, Err(CatatError::Ledger(_))));

        let recap = ledger.recap(&RecapPeriod::current_month(now), None).await.unwrap();
        assert!(recap.rows.is_empty());
        assert_eq!(ledger.balance(DEFAULT_ACCOUNT).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_recap_filters_period_and_type() {
        let ledger = InMemoryLedger::new();
        let march = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let april = Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap();

        let rows = [
            (TransactionType::Expense, 35_000, march),
            (TransactionType::Expense, 15_000, march),
            (TransactionType::Income, 2_000_000, march),
            (TransactionType::Expense, 99_000, april),
        ];
        for (ty, amount, at) in rows {
            let row = LedgerRow::from_parsed(&parsed(ty, amount, DEFAULT_ACCOUNT, None), at).unwrap();
            ledger.append(row).await.unwrap();
        }

        let month = RecapPeriod::parse("2025-03").unwrap();
        let recap = ledger.recap(&month, None).await.unwrap();
        assert_eq!(recap.rows.len(), 3);
        assert_eq!(recap.total_expense, 50_000);
        assert_eq!(recap.total_income, 2_000_000);

        let recap = ledger
            .recap(&RecapPeriod::Year(2025), Some(TransactionType::Expense))
            .await
            .unwrap();
        assert_eq!(recap.rows.len(), 3);
        assert_eq!(recap.total_expense, 149_000);
        assert_eq!(recap.total_income, 0);
    }
}

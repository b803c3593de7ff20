// Copyright (c) Tallybook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Scheduled-to-posted transition. The status flip and the balance delta
//! commit together; confirming an already-posted transaction is rejected
//! without touching any balance, so the delta can never apply twice.

use chrono::Utc;
use rusqlite::{params, Connection};

use super::transaction_by_id;
use super::writer::apply_deltas;
use crate::error::LedgerError;
use crate::models::{Transaction, TxStatus};

pub fn confirm(conn: &mut Connection, tx_id: i64) -> Result<Transaction, LedgerError> {
    let tx = conn.transaction()?;

    let mut record = transaction_by_id(&tx, tx_id)?;
    if record.status == TxStatus::Posted {
        return Err(LedgerError::AlreadyPosted(tx_id));
    }

    let confirmed_at = Utc::now().naive_utc();
    tx.execute(
        "UPDATE transactions SET status=?1, confirmed_at=?2 WHERE id=?3",
        params![TxStatus::Posted.as_str(), confirmed_at, tx_id],
    )?;
    apply_deltas(
        &tx,
        record.kind,
        record.amount,
        record.account_id,
        record.target_account_id,
    )?;
    tx.commit()?;

    record.status = TxStatus::Posted;
    record.confirmed_at = Some(confirmed_at);
    Ok(record)
}

use serde::{Deserialize, Serialize};

use lootledger_core::{DomainError, DomainResult, ItemId, MemberId, UserId};

/// One requested line of a submission: which item, how many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionLine {
    pub item_id: ItemId,
    pub quantity: u32,
}

/// A loot-registry submission as received from the admin form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionInput {
    pub author_id: UserId,
    pub author_name: String,
    pub member_id: MemberId,
    pub activity: String,
    pub lines: Vec<SubmissionLine>,
}

impl SubmissionInput {
    /// Pure pre-flight validation. Runs before any I/O, so invalid input
    /// never causes a partial write.
    ///
    /// Member and item existence are checked by the workflow against the
    /// store; everything checkable without a lookup is checked here.
    pub fn validate(&self) -> DomainResult<()> {
        if self.activity.trim().is_empty() {
            return Err(DomainError::validation("activity must not be empty"));
        }
        if self.lines.is_empty() {
            return Err(DomainError::validation(
                "a submission needs at least one line item",
            ));
        }
        if let Some(line) = self.lines.iter().find(|l| l.quantity == 0) {
            return Err(DomainError::validation(format!(
                "line for '{}' has a non-positive quantity",
                line.item_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> SubmissionInput {
        SubmissionInput {
            author_id: UserId::new(),
            author_name: "admin@guild.example".to_string(),
            member_id: MemberId::new("vex").unwrap(),
            activity: "heist".to_string(),
            lines: vec![SubmissionLine {
                item_id: ItemId::new("ak").unwrap(),
                quantity: 2,
            }],
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn empty_activity_is_rejected() {
        let mut i = input();
        i.activity = "   ".to_string();
        assert!(i.validate().is_err());
    }

    #[test]
    fn empty_line_list_is_rejected() {
        let mut i = input();
        i.lines.clear();
        assert!(i.validate().is_err());
    }

    #[test]
    fn zero_quantity_line_is_rejected() {
        let mut i = input();
        i.lines.push(SubmissionLine {
            item_id: ItemId::new("pistol").unwrap(),
            quantity: 0,
        });
        assert!(i.validate().is_err());
    }
}

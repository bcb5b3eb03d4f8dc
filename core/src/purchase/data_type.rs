// spokehub/src/purchase/data_type.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// The fixed list of record types a customer can ask an integration to sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
  #[serde(rename = "GUID")]
  Guid,
  #[serde(rename = "Assigned Users")]
  AssignedUsers,
  #[serde(rename = "Account")]
  Account,
  #[serde(rename = "Contact")]
  Contact,
  #[serde(rename = "Tickets")]
  Tickets,
  #[serde(rename = "Ticket Notes")]
  TicketNotes,
  #[serde(rename = "Ticket Attachments")]
  TicketAttachments,
  #[serde(rename = "Time Entries")]
  TimeEntries,
  #[serde(rename = "Opportunities")]
  Opportunities,
  #[serde(rename = "Opportunity Notes")]
  OpportunityNotes,
  #[serde(rename = "Opportunity Attachments")]
  OpportunityAttachments,
  #[serde(rename = "Deals")]
  Deals,
  #[serde(rename = "Alerts")]
  Alerts,
  #[serde(rename = "CMDB (Assets)")]
  CmdbAssets,
  #[serde(rename = "Tasks")]
  Tasks,
  #[serde(rename = "Line Items")]
  LineItems,
}

impl DataType {
  pub const ALL: [DataType; 16] = [
    DataType::Guid,
    DataType::AssignedUsers,
    DataType::Account,
    DataType::Contact,
    DataType::Tickets,
    DataType::TicketNotes,
    DataType::TicketAttachments,
    DataType::TimeEntries,
    DataType::Opportunities,
    DataType::OpportunityNotes,
    DataType::OpportunityAttachments,
    DataType::Deals,
    DataType::Alerts,
    DataType::CmdbAssets,
    DataType::Tasks,
    DataType::LineItems,
  ];

  pub fn label(self) -> &'static str {
    match self {
      DataType::Guid => "GUID",
      DataType::AssignedUsers => "Assigned Users",
      DataType::Account => "Account",
      DataType::Contact => "Contact",
      DataType::Tickets => "Tickets",
      DataType::TicketNotes => "Ticket Notes",
      DataType::TicketAttachments => "Ticket Attachments",
      DataType::TimeEntries => "Time Entries",
      DataType::Opportunities => "Opportunities",
      DataType::OpportunityNotes => "Opportunity Notes",
      DataType::OpportunityAttachments => "Opportunity Attachments",
      DataType::Deals => "Deals",
      DataType::Alerts => "Alerts",
      DataType::CmdbAssets => "CMDB (Assets)",
      DataType::Tasks => "Tasks",
      DataType::LineItems => "Line Items",
    }
  }

  /// Parses submitted labels, dropping repeats while keeping first-seen order.
  pub fn parse_selection<S: AsRef<str>>(labels: &[S]) -> Result<Vec<DataType>, ValidationError> {
    let mut selected: Vec<DataType> = Vec::with_capacity(labels.len());
    for label in labels {
      let data_type: DataType = label.as_ref().parse()?;
      if !selected.contains(&data_type) {
        selected.push(data_type);
      }
    }
    Ok(selected)
  }

  /// Comma-joined labels, the form stored in the purchases table.
  pub fn join(selection: &[DataType]) -> String {
    selection.iter().map(|d| d.label()).collect::<Vec<_>>().join(",")
  }

  /// Inverse of [`join`](Self::join). Empty input yields an empty selection.
  pub fn split(joined: &str) -> Result<Vec<DataType>, ValidationError> {
    let labels: Vec<&str> = joined.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
    Self::parse_selection(&labels)
  }
}

impl fmt::Display for DataType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for DataType {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    DataType::ALL
      .iter()
      .copied()
      .find(|d| d.label() == wanted)
      .ok_or_else(|| ValidationError::UnknownDataType { label: wanted.to_string() })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn selection_keeps_order_and_drops_repeats() {
    let parsed = DataType::parse_selection(&["Tickets", "Contact", "Tickets"]).unwrap();
    assert_eq!(parsed, vec![DataType::Tickets, DataType::Contact]);
  }

  #[test]
  fn unknown_label_is_rejected() {
    let err = DataType::parse_selection(&["Contact", "Invoices"]).unwrap_err();
    assert_eq!(
      err,
      ValidationError::UnknownDataType {
        label: "Invoices".to_string()
      }
    );
  }

  #[test]
  fn stored_form_survives_labels_with_spaces_and_parens() {
    let selection = vec![DataType::CmdbAssets, DataType::TimeEntries];
    let joined = DataType::join(&selection);
    assert_eq!(joined, "CMDB (Assets),Time Entries");
    assert_eq!(DataType::split(&joined).unwrap(), selection);
    assert!(DataType::split("").unwrap().is_empty());
  }

  #[test]
  fn serde_uses_display_labels() {
    let json = serde_json::to_string(&DataType::AssignedUsers).unwrap();
    assert_eq!(json, "\"Assigned Users\"");
  }
}

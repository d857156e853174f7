//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Owns the mutable expense draft and re-runs validation on every submission
//! attempt; all business rules live in the domain and use cases.

use crate::domain::entities::GroupId;
use crate::domain::{
    upsert_contribution, DomainError, DraftError, ExpenseDraft, GroupMember, Payment,
    PaymentMethod, PaymentStatus, Session,
};
use crate::ports::InputPort;
use crate::usecases::group_service::MAX_GROUP_MEMBERS;
use crate::usecases::{AuthService, ExpenseService, GroupService, PaymentService};
use async_trait::async_trait;
use inquire::{Confirm, InquireError, Password, Select, Text};
use std::fmt;
use std::sync::Arc;

/// A selectable option carrying its value, so selections never round-trip
/// through display-string matching.
struct Choice<T> {
    label: String,
    value: T,
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Maps prompt results: Esc/Ctrl-C becomes "go back" (None), everything else
/// an input error.
fn prompt<T>(result: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Input(e.to_string())),
    }
}

/// TUI adapter. Inquire prompts over the application services.
pub struct TuiInputPort {
    auth: Arc<AuthService>,
    expenses: Arc<ExpenseService>,
    groups: Arc<GroupService>,
    payments: Arc<PaymentService>,
    currency: String,
}

impl TuiInputPort {
    pub fn new(
        auth: Arc<AuthService>,
        expenses: Arc<ExpenseService>,
        groups: Arc<GroupService>,
        payments: Arc<PaymentService>,
        currency: String,
    ) -> Self {
        Self {
            auth,
            expenses,
            groups,
            payments,
            currency,
        }
    }

    fn amount(&self, value: f64) -> String {
        format!("{}{:.2}", self.currency, value)
    }

    /// Dashboard greeting. Falls back to the cached session name when the
    /// profile lookup fails; the menu still works without it.
    async fn greet(&self, session: &Session) {
        let name = match self.auth.profile(session).await {
            Ok(name) => name,
            Err(_) => session
                .username
                .clone()
                .unwrap_or_else(|| format!("user {}", session.user_id)),
        };
        println!("Welcome, {}!", name);
    }

    async fn auth_menu(&self) -> Result<Option<Session>, DomainError> {
        loop {
            let Some(action) = prompt(
                Select::new("Welcome to Splitfair", vec!["Log in", "Register", "Quit"]).prompt(),
            )?
            else {
                return Ok(None);
            };
            match action {
                "Log in" => {
                    if let Some(session) = self.login_flow().await? {
                        return Ok(Some(session));
                    }
                }
                "Register" => self.register_flow().await?,
                _ => return Ok(None),
            }
        }
    }

    async fn login_flow(&self) -> Result<Option<Session>, DomainError> {
        let Some(email) = prompt(Text::new("Email:").prompt())? else {
            return Ok(None);
        };
        let Some(password) = prompt(Password::new("Password:").without_confirmation().prompt())?
        else {
            return Ok(None);
        };
        match self.auth.login(&email, &password).await {
            Ok(session) => {
                println!(
                    "Logged in as {}.",
                    session.username.as_deref().unwrap_or("user")
                );
                Ok(Some(session))
            }
            Err(e) => {
                println!("Login failed: {}", e);
                Ok(None)
            }
        }
    }

    async fn register_flow(&self) -> Result<(), DomainError> {
        let Some(username) = prompt(Text::new("Username:").prompt())? else {
            return Ok(());
        };
        let Some(email) = prompt(Text::new("Email:").prompt())? else {
            return Ok(());
        };
        let Some(password) = prompt(Password::new("Password:").prompt())? else {
            return Ok(());
        };
        let Some(phone) = prompt(Text::new("Phone number:").prompt())? else {
            return Ok(());
        };
        match self
            .auth
            .register(&username, &email, &password, &phone)
            .await
        {
            Ok(message) => println!("{} You can now log in.", message),
            Err(e) => println!("Signup failed: {}", e),
        }
        Ok(())
    }

    async fn select_group_id(&self, session: &Session) -> Result<Option<GroupId>, DomainError> {
        let groups = self.expenses.groups(session).await?;
        if groups.is_empty() {
            println!("No groups found.");
            return Ok(None);
        }
        let options: Vec<Choice<GroupId>> = groups
            .iter()
            .map(|g| Choice {
                label: format!("{} ({} members)", g.group_name, g.members.len()),
                value: g.group_id,
            })
            .collect();
        Ok(prompt(Select::new("Select group", options).prompt())?.map(|c| c.value))
    }

    async fn new_expense_flow(&self, session: &Session) -> Result<(), DomainError> {
        let Some(group_id) = self.select_group_id(session).await? else {
            return Ok(());
        };

        let mut draft = ExpenseDraft::default();
        self.expenses
            .select_group(session, &mut draft, group_id)
            .await?;

        let payer_options: Vec<Choice<i64>> = draft
            .participants
            .iter()
            .map(|p| Choice {
                label: p.username.clone(),
                value: p.user_id,
            })
            .collect();
        let Some(payer) = prompt(Select::new("Paid by", payer_options).prompt())? else {
            return Ok(());
        };
        draft.paid_by = Some(payer.value);

        let Some(total) = self.prompt_total().await? else {
            return Ok(());
        };
        self.expenses.set_amount(&mut draft, total);

        let Some(description) = prompt(Text::new("Description:").prompt())? else {
            return Ok(());
        };
        draft.description = description;

        loop {
            self.edit_contributions(&mut draft)?;
            match self.expenses.submit(session, &draft).await {
                Ok(()) => {
                    println!("Expense created successfully!");
                    return Ok(());
                }
                Err(DomainError::Draft(e)) => {
                    self.print_draft_error(&e);
                    let retry = prompt(
                        Confirm::new("Edit payments and try again?")
                            .with_default(true)
                            .prompt(),
                    )?
                    .unwrap_or(false);
                    if !retry {
                        println!("Expense discarded.");
                        return Ok(());
                    }
                }
                Err(e) => {
                    println!("Failed to create expense: {}", e);
                    return Ok(());
                }
            }
        }
    }

    async fn prompt_total(&self) -> Result<Option<f64>, DomainError> {
        loop {
            let Some(raw) = prompt(Text::new("Total amount:").prompt())? else {
                return Ok(None);
            };
            match raw.trim().parse::<f64>() {
                Ok(total) if total > 0.0 && total.is_finite() => return Ok(Some(total)),
                _ => println!("Enter a positive amount."),
            }
        }
    }

    /// One pass over the roster: show the current (possibly seeded) amount
    /// for each member and take a replacement. Blank keeps the current
    /// value; 0 or unparsable input drops the member from the payments.
    fn edit_contributions(&self, draft: &mut ExpenseDraft) -> Result<(), DomainError> {
        println!("Specify how much each person contributed (blank keeps the shown value).");
        for participant in draft.participants.clone() {
            let current = draft
                .contributions
                .iter()
                .find(|c| c.user_id == participant.user_id)
                .map(|c| format!("{:.2}", c.amount));
            let message = format!(
                "{} [{}]:",
                participant.username,
                current.as_deref().unwrap_or("not contributing")
            );
            let Some(raw) = prompt(Text::new(&message).prompt())? else {
                return Ok(());
            };
            if raw.trim().is_empty() {
                continue;
            }
            draft.contributions =
                upsert_contribution(&draft.contributions, participant.user_id, &raw);
        }

        let sum: f64 = draft.contributions.iter().map(|c| c.amount).sum();
        println!(
            "Total paid: {} / expense amount: {}",
            self.amount(sum),
            self.amount(draft.amount.unwrap_or(0.0))
        );
        Ok(())
    }

    fn print_draft_error(&self, e: &DraftError) {
        match e {
            DraftError::ReconciliationMismatch { sum, total } => println!(
                "The sum of payments ({}) does not match the total amount ({}).",
                self.amount(*sum),
                self.amount(*total)
            ),
            other => println!("{}", other),
        }
    }

    async fn payments_menu(&self, session: &Session) -> Result<(), DomainError> {
        loop {
            let Some(action) = prompt(
                Select::new(
                    "Payments",
                    vec!["History", "Send payment", "Mark complete", "Back"],
                )
                .prompt(),
            )?
            else {
                return Ok(());
            };
            match action {
                "History" => self.print_history(session).await?,
                "Send payment" => self.send_payment_flow(session).await?,
                "Mark complete" => self.complete_payment_flow(session).await?,
                _ => return Ok(()),
            }
        }
    }

    fn format_payment(&self, p: &Payment) -> String {
        let date = p
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "#{} {} to {} via {} [{}] {}",
            p.payment_id,
            self.amount(p.amount),
            p.payee_name
                .clone()
                .unwrap_or_else(|| format!("user {}", p.payee_id)),
            p.payment_method,
            p.payment_status,
            date
        )
    }

    async fn print_history(&self, session: &Session) -> Result<(), DomainError> {
        let history = self.payments.history(session).await?;
        if history.is_empty() {
            println!("No payment history yet.");
            return Ok(());
        }
        for payment in &history {
            println!("{}", self.format_payment(payment));
        }
        Ok(())
    }

    async fn send_payment_flow(&self, session: &Session) -> Result<(), DomainError> {
        let Some(group_id) = self.select_group_id(session).await? else {
            return Ok(());
        };
        let payees = self.payments.payees(session, group_id).await?;
        if payees.is_empty() {
            println!("No other members in this group.");
            return Ok(());
        }
        let options: Vec<Choice<i64>> = payees
            .iter()
            .map(|p| Choice {
                label: p.username.clone(),
                value: p.user_id,
            })
            .collect();
        let Some(payee) = prompt(Select::new("Pay to", options).prompt())? else {
            return Ok(());
        };
        let Some(raw_amount) = prompt(Text::new("Amount:").prompt())? else {
            return Ok(());
        };
        let methods = vec![
            PaymentMethod::Upi,
            PaymentMethod::Cash,
            PaymentMethod::BankTransfer,
        ];
        let Some(method) = prompt(Select::new("Payment method", methods).prompt())? else {
            return Ok(());
        };

        match self
            .payments
            .send(session, group_id, payee.value, &raw_amount, method)
            .await
        {
            Ok(payment) => println!(
                "Payment of {} initiated (#{}).",
                self.amount(payment.amount),
                payment.payment_id
            ),
            Err(e) => println!("Payment failed: {}", e),
        }
        Ok(())
    }

    async fn complete_payment_flow(&self, session: &Session) -> Result<(), DomainError> {
        let pending: Vec<Payment> = self
            .payments
            .history(session)
            .await?
            .into_iter()
            .filter(|p| p.payment_status == PaymentStatus::Pending)
            .collect();
        if pending.is_empty() {
            println!("No pending payments.");
            return Ok(());
        }
        let options: Vec<Choice<i64>> = pending
            .iter()
            .map(|p| Choice {
                label: self.format_payment(p),
                value: p.payment_id,
            })
            .collect();
        let Some(choice) = prompt(Select::new("Mark which payment complete?", options).prompt())?
        else {
            return Ok(());
        };
        match self.payments.complete(session, choice.value).await {
            Ok(()) => println!("Payment marked as complete."),
            Err(e) => println!("Failed to complete payment: {}", e),
        }
        Ok(())
    }

    async fn groups_menu(&self, session: &Session) -> Result<(), DomainError> {
        loop {
            let Some(action) = prompt(
                Select::new("Groups", vec!["List groups", "Create group", "Back"]).prompt(),
            )?
            else {
                return Ok(());
            };
            match action {
                "List groups" => self.print_groups(session).await?,
                "Create group" => self.create_group_flow(session).await?,
                _ => return Ok(()),
            }
        }
    }

    async fn create_group_flow(&self, session: &Session) -> Result<(), DomainError> {
        let Some(group_name) = prompt(Text::new("Group name:").prompt())? else {
            return Ok(());
        };

        let mut members: Vec<GroupMember> = Vec::new();
        while members.len() < MAX_GROUP_MEMBERS {
            let Some(username) = prompt(Text::new("Member username:").prompt())? else {
                break;
            };
            let Some(email) = prompt(Text::new("Member email:").prompt())? else {
                break;
            };
            let is_admin = prompt(
                Confirm::new("Make this member an admin?")
                    .with_default(false)
                    .prompt(),
            )?
            .unwrap_or(false);
            members.push(GroupMember {
                username,
                email,
                is_admin,
            });

            let more = prompt(
                Confirm::new("Add another member?")
                    .with_default(true)
                    .prompt(),
            )?
            .unwrap_or(false);
            if !more {
                break;
            }
        }

        match self.groups.create(session, &group_name, &members).await {
            Ok(message) => println!("{}", message),
            Err(e) => println!("Failed to create group: {}", e),
        }
        Ok(())
    }

    async fn expense_splits_flow(&self, session: &Session) -> Result<(), DomainError> {
        let Some(expense_id) = self.prompt_expense_id().await? else {
            return Ok(());
        };

        loop {
            let splits = self.expenses.splits(session, expense_id).await?;
            if splits.is_empty() {
                println!("No splits recorded for expense #{} yet.", expense_id);
            } else {
                for split in &splits {
                    println!(
                        "{}: owes {}, paid {}",
                        split
                            .name
                            .clone()
                            .unwrap_or_else(|| format!("user {}", split.user_id)),
                        self.amount(split.amount_owed),
                        self.amount(split.amount_paid)
                    );
                }
            }

            let add = prompt(Confirm::new("Add a split?").with_default(false).prompt())?
                .unwrap_or(false);
            if !add {
                return Ok(());
            }

            let Some(user_id) = self.prompt_user_id().await? else {
                return Ok(());
            };
            let Some(raw_owed) = prompt(Text::new("Amount owed:").prompt())? else {
                return Ok(());
            };
            let Some(raw_paid) = prompt(Text::new("Amount paid:").prompt())? else {
                return Ok(());
            };
            match self
                .expenses
                .add_split(session, expense_id, user_id, &raw_owed, &raw_paid)
                .await
            {
                Ok(()) => println!("Split recorded."),
                Err(e) => println!("Failed to record split: {}", e),
            }
        }
    }

    async fn prompt_expense_id(&self) -> Result<Option<i64>, DomainError> {
        loop {
            let Some(raw) = prompt(Text::new("Expense id:").prompt())? else {
                return Ok(None);
            };
            match raw.trim().parse::<i64>() {
                Ok(id) if id > 0 => return Ok(Some(id)),
                _ => println!("Enter a positive expense id."),
            }
        }
    }

    async fn prompt_user_id(&self) -> Result<Option<i64>, DomainError> {
        loop {
            let Some(raw) = prompt(Text::new("User id:").prompt())? else {
                return Ok(None);
            };
            match raw.trim().parse::<i64>() {
                Ok(id) if id > 0 => return Ok(Some(id)),
                _ => println!("Enter a positive user id."),
            }
        }
    }

    async fn print_groups(&self, session: &Session) -> Result<(), DomainError> {
        let groups = self.groups.groups(session).await?;
        if groups.is_empty() {
            println!("No groups found. Create one to get started.");
            return Ok(());
        }
        for group in &groups {
            println!(
                "{} (created {})",
                group.group_name,
                group.created_at.as_deref().unwrap_or("-")
            );
            for member in &group.members {
                let role = if member.is_admin { "admin" } else { "member" };
                println!("  - {} <{}> ({})", member.username, member.email, role);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let mut session = self.auth.current_session().await?;
        if let Some(active) = &session {
            self.greet(active).await;
        }

        loop {
            let Some(active) = session.clone() else {
                match self.auth_menu().await? {
                    Some(s) => {
                        self.greet(&s).await;
                        session = Some(s);
                        continue;
                    }
                    None => return Ok(()),
                }
            };

            let Some(action) = prompt(
                Select::new(
                    "Main menu",
                    vec![
                        "New expense",
                        "Expense splits",
                        "Payments",
                        "Groups",
                        "Log out",
                        "Quit",
                    ],
                )
                .prompt(),
            )?
            else {
                return Ok(());
            };

            match action {
                "New expense" => self.new_expense_flow(&active).await?,
                "Expense splits" => self.expense_splits_flow(&active).await?,
                "Payments" => self.payments_menu(&active).await?,
                "Groups" => self.groups_menu(&active).await?,
                "Log out" => {
                    self.auth.logout().await?;
                    session = None;
                    println!("Logged out.");
                }
                _ => return Ok(()),
            }
        }
    }
}

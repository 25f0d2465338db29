//! Mailing lists and personalized fan-out.
//!
//! A transmission is built in three steps:
//!
//! 1. **Expand**: a list id becomes a [`MailOrder`] over the list's members.
//! 2. **Personalize**: every id is resolved through the [`UserDirectory`]
//!    into a recipient with its own substitutions. One failed lookup
//!    abandons the batch.
//! 3. **Dispatch**: one request to the [`MailProvider`]. No retries.

use crate::error::{RegistrationError, Result};
use crate::metrics::{MAIL_DISPATCH_FAILED, MAIL_DISPATCHED, MAIL_RECIPIENTS};
use crate::models::{
    Content, ListId, MailInfo, MailList, MailOrder, MailOrderList, MailStatus, Recipient, UserId,
};
use crate::providers::{MailListStore, MailProvider, MembershipUpdate, UserDirectory};
use futures::future::try_join_all;
use tracing::{debug, info, warn};

/// Mail dispatcher.
///
/// # Type Parameters
///
/// - `L`: Mailing list store
/// - `D`: User directory
/// - `M`: Mail provider
#[derive(Clone)]
pub struct MailDispatcher<L, D, M>
where
    L: MailListStore,
    D: UserDirectory,
    M: MailProvider,
{
    lists: L,
    directory: D,
    provider: M,
}

impl<L, D, M> MailDispatcher<L, D, M>
where
    L: MailListStore,
    D: UserDirectory,
    M: MailProvider,
{
    /// Create a new mail dispatcher.
    #[must_use]
    pub const fn new(lists: L, directory: D, provider: M) -> Self {
        Self {
            lists,
            directory,
            provider,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // List Management
    // ═══════════════════════════════════════════════════════════════════

    /// Create a mailing list.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::AlreadyExists` if the id is taken, or
    /// `RegistrationError::StoreWriteFailed` if the store fails.
    pub async fn create_list(&self, list: MailList) -> Result<MailList> {
        self.lists.insert(&list).await?;
        info!(list_id = %list.id, members = list.user_ids.len(), "Mailing list created");
        Ok(list)
    }

    /// Add users to a list. Users already on it are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::ListNotFound` if the list does not exist.
    pub async fn add_members(
        &self,
        list_id: &ListId,
        user_ids: impl IntoIterator<Item = UserId>,
    ) -> Result<()> {
        self.update_list(list_id, MembershipUpdate::add(user_ids)).await
    }

    /// Remove users from a list. Users not on it are ignored.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::ListNotFound` if the list does not exist.
    pub async fn remove_members(
        &self,
        list_id: &ListId,
        user_ids: impl IntoIterator<Item = UserId>,
    ) -> Result<()> {
        self.update_list(list_id, MembershipUpdate::remove(user_ids)).await
    }

    async fn update_list(&self, list_id: &ListId, update: MembershipUpdate) -> Result<()> {
        self.lists
            .update(list_id, &update)
            .await
            .map_err(|e| list_error(list_id, e))?;
        debug!(list_id = %list_id, ?update, "Mailing list updated");
        Ok(())
    }

    /// Get a mailing list.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::ListNotFound` if the list does not exist.
    pub async fn get_list(&self, list_id: &ListId) -> Result<MailList> {
        self.lists
            .find(list_id)
            .await
            .map_err(|e| list_error(list_id, e))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Fan-out
    // ═══════════════════════════════════════════════════════════════════

    /// Turn a list into an order over its current members.
    ///
    /// Members keep the order the store returns them in.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::ListNotFound` if the list does not exist,
    /// or `RegistrationError::LookupFailed` if the store fails.
    pub async fn expand_to_order(&self, list_id: &ListId, template: &str) -> Result<MailOrder> {
        let list = self.get_list(list_id).await?;

        Ok(MailOrder {
            ids: list.user_ids.into_iter().collect(),
            template: template.to_string(),
        })
    }

    /// Resolve every recipient of `order` into a transmission.
    ///
    /// Lookups run concurrently; recipient `i` always corresponds to
    /// `order.ids[i]`.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::UserResolutionFailed` for the first id
    /// that fails to resolve. No partial transmission is produced.
    #[tracing::instrument(skip(self, order), fields(template = %order.template, recipients = order.ids.len()))]
    pub async fn build_mail_info(&self, order: &MailOrder) -> Result<MailInfo> {
        let users = try_join_all(order.ids.iter().map(|user_id| async move {
            self.directory
                .user_info(user_id)
                .await
                .map_err(|e| RegistrationError::UserResolutionFailed {
                    user_id: user_id.to_string(),
                    reason: e.to_string(),
                })
        }))
        .await?;

        Ok(MailInfo {
            content: Content {
                template_id: order.template.clone(),
            },
            recipients: users.iter().map(Recipient::for_user).collect(),
        })
    }

    /// Submit a transmission to the provider.
    ///
    /// The provider's status is returned as received.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::DispatchFailed` if the provider rejects
    /// the transmission or cannot be reached, and
    /// `RegistrationError::InvalidProviderResponse` if its reply is not JSON.
    #[tracing::instrument(skip(self, mail_info), fields(template = %mail_info.content.template_id))]
    pub async fn dispatch(&self, mail_info: &MailInfo) -> Result<MailStatus> {
        match self.provider.send(mail_info).await {
            Ok(status) => {
                let recipients = mail_info.recipients.len() as u64;
                metrics::counter!(MAIL_DISPATCHED).increment(1);
                metrics::counter!(MAIL_RECIPIENTS).increment(recipients);
                info!(recipients, "Transmission accepted");
                Ok(status)
            }
            Err(e) => {
                metrics::counter!(MAIL_DISPATCH_FAILED).increment(1);
                warn!(error = %e, "Transmission failed");
                Err(e)
            }
        }
    }

    /// Mail an explicit sequence of users.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::build_mail_info`] or [`Self::dispatch`]. The
    /// provider is not called if a recipient fails to resolve.
    pub async fn send_by_ids(&self, order: &MailOrder) -> Result<MailStatus> {
        let mail_info = self.build_mail_info(order).await.inspect_err(|_| {
            metrics::counter!(MAIL_DISPATCH_FAILED).increment(1);
        })?;
        self.dispatch(&mail_info).await
    }

    /// Mail every member of a list.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::expand_to_order`] or [`Self::send_by_ids`].
    pub async fn send_by_list(&self, order: &MailOrderList) -> Result<MailStatus> {
        let order = self
            .expand_to_order(&order.list_id, &order.template)
            .await
            .inspect_err(|_| {
                metrics::counter!(MAIL_DISPATCH_FAILED).increment(1);
            })?;
        self.send_by_ids(&order).await
    }
}

fn list_error(list_id: &ListId, err: RegistrationError) -> RegistrationError {
    if err.is_not_found() {
        RegistrationError::ListNotFound {
            list_id: list_id.to_string(),
        }
    } else {
        err
    }
}

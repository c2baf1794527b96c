//! Buyer-for-recipient authorization.
//!
//! Purchases act on a club-member identity, not an end-user session: a
//! buyer may reserve and order for themselves, or for a member whose
//! `managed_by` points at the buyer (guardian purchases). Everything else
//! is forbidden. Authentication happens outside this crate; what arrives
//! here is already a club-member id.

use crate::{
    entities::{Club, Member, member},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, prelude::*};

/// The resolved actors of a purchase.
#[derive(Debug, Clone)]
pub struct PurchaseParties {
    /// The member executing the purchase
    pub buyer: member::Model,
    /// The member receiving the permits (may equal the buyer)
    pub recipient: member::Model,
}

/// Verifies the club, both members and the buyer's right to act for the
/// recipient. Returns the resolved pair or a not-found/forbidden error.
pub async fn authorize_purchase<C>(
    db: &C,
    club_id: &str,
    buyer_id: &str,
    member_id: &str,
) -> Result<PurchaseParties>
where
    C: ConnectionTrait,
{
    let club = Club::find_by_id(club_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(format!("club {club_id}")))?;

    let buyer = active_member(db, &club, buyer_id).await?;
    let recipient = if buyer_id == member_id {
        buyer.clone()
    } else {
        active_member(db, &club, member_id).await?
    };

    if buyer.id != recipient.id && recipient.managed_by.as_deref() != Some(buyer.id.as_str()) {
        return Err(Error::forbidden(format!(
            "{} may not purchase on behalf of {}",
            buyer.name, recipient.name
        )));
    }

    Ok(PurchaseParties { buyer, recipient })
}

/// Loads a member and checks it is alive and belongs to the club.
async fn active_member<C>(db: &C, club: &crate::entities::ClubModel, id: &str) -> Result<member::Model>
where
    C: ConnectionTrait,
{
    let found = Member::find_by_id(id)
        .one(db)
        .await?
        .filter(|m| m.club_id == club.id && !m.is_deleted);

    found.ok_or_else(|| Error::not_found(format!("member {id} in club {}", club.name)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils;

    #[tokio::test]
    async fn test_buyer_for_self() -> Result<()> {
        let db = test_utils::setup_test_db().await?;
        let club = test_utils::create_test_club(&db, "Alnwick AC").await?;
        let member = test_utils::create_test_member(&db, &club.id, "Edith Salmon").await?;

        let parties = authorize_purchase(&db, &club.id, &member.id, &member.id).await?;
        assert_eq!(parties.buyer.id, member.id);
        assert_eq!(parties.recipient.id, member.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_guardian_for_managed_member() -> Result<()> {
        let db = test_utils::setup_test_db().await?;
        let club = test_utils::create_test_club(&db, "Alnwick AC").await?;
        let guardian = test_utils::create_test_member(&db, &club.id, "Edith Salmon").await?;
        let junior =
            test_utils::create_managed_member(&db, &club.id, "Tom Salmon", &guardian.id).await?;

        let parties = authorize_purchase(&db, &club.id, &guardian.id, &junior.id).await?;
        assert_eq!(parties.buyer.id, guardian.id);
        assert_eq!(parties.recipient.id, junior.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_unrelated_member_is_forbidden() -> Result<()> {
        let db = test_utils::setup_test_db().await?;
        let club = test_utils::create_test_club(&db, "Alnwick AC").await?;
        let buyer = test_utils::create_test_member(&db, &club.id, "Edith Salmon").await?;
        let stranger = test_utils::create_test_member(&db, &club.id, "Rob Pike").await?;

        let result = authorize_purchase(&db, &club.id, &buyer.id, &stranger.id).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_managed_member_cannot_buy_for_guardian() -> Result<()> {
        let db = test_utils::setup_test_db().await?;
        let club = test_utils::create_test_club(&db, "Alnwick AC").await?;
        let guardian = test_utils::create_test_member(&db, &club.id, "Edith Salmon").await?;
        let junior =
            test_utils::create_managed_member(&db, &club.id, "Tom Salmon", &guardian.id).await?;

        // The relation is directional
        let result = authorize_purchase(&db, &club.id, &junior.id, &guardian.id).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_club_and_member() -> Result<()> {
        let db = test_utils::setup_test_db().await?;
        let club = test_utils::create_test_club(&db, "Alnwick AC").await?;
        let member = test_utils::create_test_member(&db, &club.id, "Edith Salmon").await?;

        let result = authorize_purchase(&db, "missing-club", &member.id, &member.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { what: _ }));

        let result = authorize_purchase(&db, &club.id, "missing-member", &member.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { what: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_member_of_other_club_is_not_found() -> Result<()> {
        let db = test_utils::setup_test_db().await?;
        let club = test_utils::create_test_club(&db, "Alnwick AC").await?;
        let other = test_utils::create_test_club(&db, "Coquet AC").await?;
        let outsider = test_utils::create_test_member(&db, &other.id, "Rob Pike").await?;

        let result = authorize_purchase(&db, &club.id, &outsider.id, &outsider.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { what: _ }));

        Ok(())
    }
}

use crate::action::{Action, Bid};
use crate::errors::IllegalAction;

/// Decides whether `proposed` may follow `current`.
///
/// With wild ones enabled the raise relation is asymmetric:
///
/// - onto ones from another face the quantity may drop to `ceil(q / 2)`
/// - off ones onto another face the quantity must reach `q * 2 + 1`
/// - ones onto ones, and any other pair, need a strict `(quantity, face)` raise
///
/// Going to ones and back does not return to the starting quantity, so the
/// cases are checked directly rather than through a single strength score.
///
/// # Examples
///
/// ```
/// use dudo_engine::action::Bid;
/// use dudo_engine::rules::is_legal_bid;
///
/// // 6 x 4s may be followed by 3 x 1s but not 2 x 1s
/// assert!(is_legal_bid(Some(Bid::new(6, 4)), Bid::new(3, 1), true, 6));
/// assert!(!is_legal_bid(Some(Bid::new(6, 4)), Bid::new(2, 1), true, 6));
///
/// // 3 x 1s needs at least 7 of another face
/// assert!(!is_legal_bid(Some(Bid::new(3, 1)), Bid::new(6, 5), true, 6));
/// assert!(is_legal_bid(Some(Bid::new(3, 1)), Bid::new(7, 2), true, 6));
/// ```
pub fn is_legal_bid(current: Option<Bid>, proposed: Bid, wild_ones: bool, faces: u8) -> bool {
    if proposed.quantity < 1 || proposed.face < 1 || proposed.face > faces {
        return false;
    }
    let Some(cur) = current else {
        return true;
    };
    if wild_ones {
        match (cur.is_on_ones(), proposed.is_on_ones()) {
            (true, false) => {
                // no quantity can clear a ones bid past half of u32::MAX
                return cur
                    .quantity
                    .checked_mul(2)
                    .and_then(|q| q.checked_add(1))
                    .is_some_and(|min| proposed.quantity >= min);
            }
            (false, true) => return proposed.quantity >= cur.quantity.div_ceil(2),
            (true, true) => return proposed.quantity > cur.quantity,
            (false, false) => {}
        }
    }
    proposed.quantity > cur.quantity
        || (proposed.quantity == cur.quantity && proposed.face > cur.face)
}

/// Everything the contextual legality check needs to know about the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleContext {
    pub current_bid: Option<Bid>,
    pub faces: u8,
    pub wild_ones: bool,
    pub exact_call_enabled: bool,
    /// Dice still in play; no bid may claim more
    pub total_dice: u32,
}

/// Validates an action against the current table.
///
/// # Errors
///
/// Returns the [`IllegalAction`] describing the first rule the action breaks.
///
/// # Examples
///
/// ```
/// use dudo_engine::action::{Action, Bid};
/// use dudo_engine::errors::IllegalAction;
/// use dudo_engine::rules::{check_action, RuleContext};
///
/// let ctx = RuleContext {
///     current_bid: None,
///     faces: 6,
///     wild_ones: true,
///     exact_call_enabled: false,
///     total_dice: 10,
/// };
/// assert_eq!(check_action(&ctx, &Action::Challenge), Err(IllegalAction::NothingToChallenge));
/// assert!(check_action(&ctx, &Action::Bid(Bid::new(2, 5))).is_ok());
/// ```
pub fn check_action(ctx: &RuleContext, action: &Action) -> Result<(), IllegalAction> {
    match action {
        Action::Bid(bid) => {
            if bid.face < 1 || bid.face > ctx.faces {
                return Err(IllegalAction::FaceOutOfRange {
                    face: bid.face,
                    faces: ctx.faces,
                });
            }
            if bid.quantity == 0 {
                return Err(IllegalAction::ZeroQuantity);
            }
            if bid.quantity > ctx.total_dice {
                return Err(IllegalAction::QuantityExceedsDice {
                    quantity: bid.quantity,
                    total: ctx.total_dice,
                });
            }
            if is_legal_bid(ctx.current_bid, *bid, ctx.wild_ones, ctx.faces) {
                Ok(())
            } else {
                Err(IllegalAction::BidNotHigher)
            }
        }
        Action::Challenge => match ctx.current_bid {
            Some(_) => Ok(()),
            None => Err(IllegalAction::NothingToChallenge),
        },
        Action::Exact => {
            if ctx.current_bid.is_none() {
                Err(IllegalAction::NothingToChallenge)
            } else if !ctx.exact_call_enabled {
                Err(IllegalAction::ExactCallDisabled)
            } else {
                Ok(())
            }
        }
    }
}

/// The cheapest opening bid: one die showing the lowest face.
pub const fn minimum_opening_bid() -> Bid {
    Bid::new(1, 1)
}

/// Action forced on a player whose own choice was unusable.
///
/// Challenges the standing bid when there is one, otherwise opens with
/// [`minimum_opening_bid`]. Both are legal whenever at least one die is in play.
pub fn fallback_action(current_bid: Option<Bid>) -> Action {
    match current_bid {
        Some(_) => Action::Challenge,
        None => Action::Bid(minimum_opening_bid()),
    }
}

/// Every legal bid up to `max_quantity`, in ascending `(quantity, face)` order.
pub fn legal_bids(current: Option<Bid>, wild_ones: bool, faces: u8, max_quantity: u32) -> Vec<Bid> {
    let mut out = Vec::new();
    for quantity in 1..=max_quantity {
        for face in 1..=faces {
            let bid = Bid::new(quantity, face);
            if is_legal_bid(current, bid, wild_ones, faces) {
                out.push(bid);
            }
        }
    }
    out
}

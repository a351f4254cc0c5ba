//! Hop Merging
//!
//! Folds every top-level route of a bucket into per-stage pool fills.
//! Amounts are accumulated exactly; percentages are derived once, from the
//! final totals, so the result does not depend on which member came first.

use composer_core::{Address, Amount, PoolId};
use indexmap::IndexMap;

use crate::grouper::RouteBucket;
use crate::percentage::{pool_share_percentage, route_share_percentage};
use crate::state::{ComposeError, Hop, PoolFill};

/// Running totals for one pool at one stage.
#[derive(Debug, Clone, PartialEq)]
struct FillAccumulator {
    pool_id: PoolId,
    exchange: String,
    token_in: Address,
    token_out: Address,
    swap_amount: Amount,
    amount_out: Amount,
}

/// A bucket after merging, before token resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedGroup {
    pub slug: String,
    pub index: usize,
    /// Start token followed by each stage's output token
    pub path: Vec<Address>,
    pub sub_routes: Vec<Vec<PoolFill>>,
    /// Share of the boundary input entering this group, if any member
    /// started from the boundary input token
    pub raw_swap_percentage: Option<f64>,
}

/// Fill id: the bare pool id for single-stage groups, otherwise scoped to
/// the step so a pool recurring at two stages stays two fills.
pub fn pool_fill_id(hop: &Hop, stage_count: usize) -> String {
    if stage_count == 1 {
        hop.pool_id.to_string()
    } else {
        format!("{}-{}-{}", hop.pool_id, hop.token_in, hop.token_out)
    }
}

/// Merge one bucket.
///
/// `token_in` and `amount_in` are the plan's boundary input; a member only
/// counts toward the group percentage when its first hop spends `token_in`.
pub fn merge_group(
    bucket: &RouteBucket<'_>,
    token_in: &Address,
    amount_in: &Amount,
) -> Result<MergedGroup, ComposeError> {
    let first = bucket.members.first().ok_or(ComposeError::NoRoutes)?;
    let stage_count = first.stage_count();

    let mut stages: Vec<IndexMap<String, FillAccumulator>> =
        (0..stage_count).map(|_| IndexMap::new()).collect();
    let mut boundary_volume = Amount::zero();
    let mut counted = false;

    for member in &bucket.members {
        if member.stage_count() != stage_count {
            return Err(ComposeError::StageCountMismatch {
                slug: bucket.slug.clone(),
                expected: stage_count,
                found: member.stage_count(),
            });
        }

        for (position, stage) in member.stages.iter().enumerate() {
            if stage.is_empty() {
                return Err(ComposeError::EmptyStage {
                    slug: bucket.slug.clone(),
                    stage: position,
                });
            }
            let fills = &mut stages[position];
            for hop in stage {
                let id = pool_fill_id(hop, stage_count);
                let acc = fills.entry(id).or_insert_with(|| FillAccumulator {
                    pool_id: hop.pool_id.clone(),
                    exchange: hop.exchange_id.clone(),
                    token_in: hop.token_in.clone(),
                    token_out: hop.token_out.clone(),
                    swap_amount: Amount::zero(),
                    amount_out: Amount::zero(),
                });
                acc.swap_amount += &hop.input_amount;
                acc.amount_out += &hop.output_amount;
            }
        }

        if member.start_token() == Some(token_in) {
            boundary_volume += &member.first_stage_amount();
            counted = true;
        }
    }

    let mut sub_routes = Vec::with_capacity(stage_count);
    for (position, fills) in stages.into_iter().enumerate() {
        let total: Amount = fills.values().map(|f| &f.swap_amount).sum();
        if total.is_zero() {
            return Err(ComposeError::ZeroStageTotal {
                slug: bucket.slug.clone(),
                stage: position,
            });
        }
        let stage_fills = fills
            .into_iter()
            .map(|(id, acc)| PoolFill {
                swap_percentage: pool_share_percentage(&acc.swap_amount, &total),
                id,
                pool_id: acc.pool_id,
                exchange: acc.exchange,
                token_in: acc.token_in,
                token_out: acc.token_out,
                swap_amount: acc.swap_amount,
                amount_out: acc.amount_out,
                total: total.clone(),
            })
            .collect();
        sub_routes.push(stage_fills);
    }

    let mut path = Vec::with_capacity(stage_count + 1);
    if let Some(start) = first.start_token() {
        path.push(start.clone());
    }
    path.extend(first.stage_outputs().cloned());

    let raw_swap_percentage =
        counted.then(|| route_share_percentage(&boundary_volume, amount_in));

    Ok(MergedGroup {
        slug: bucket.slug.clone(),
        index: bucket.index,
        path,
        sub_routes,
        raw_swap_percentage,
    })
}

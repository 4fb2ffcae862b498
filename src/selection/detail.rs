use std::collections::HashMap;

use crate::topology::TopologyGraph;

const PARTNER_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partner {
    pub id: String,
    pub name: String,
    pub messages: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDetail {
    pub id: String,
    pub sent: u64,
    pub received: u64,
    pub partners: Vec<Partner>,
}

/// Traffic summary for `id` over the valid edges of `graph`. Returns `None`
/// for ids that are not in the graph.
pub fn detail_for(graph: &TopologyGraph, id: &str) -> Option<NodeDetail> {
    let index = graph.index_of(id)?;

    let mut sent = 0u64;
    let mut received = 0u64;
    let mut traffic_by_partner: HashMap<usize, u64> = HashMap::new();
    for edge in graph.edges().iter().filter(|edge| edge.touches(index)) {
        if edge.from == index {
            sent = sent.saturating_add(edge.message_count);
        }
        if edge.to == index {
            received = received.saturating_add(edge.message_count);
        }

        let partner = if edge.from == index { edge.to } else { edge.from };
        if partner != index {
            let total = traffic_by_partner.entry(partner).or_insert(0);
            *total = total.saturating_add(edge.message_count);
        }
    }

    let mut partners = traffic_by_partner
        .into_iter()
        .filter_map(|(partner, messages)| {
            graph.node(partner).map(|node| Partner {
                id: node.id.clone(),
                name: node.name.clone(),
                messages,
            })
        })
        .collect::<Vec<_>>();
    partners.sort_by(|a, b| b.messages.cmp(&a.messages).then_with(|| a.id.cmp(&b.id)));
    partners.truncate(PARTNER_LIMIT);

    Some(NodeDetail {
        id: id.to_owned(),
        sent,
        received,
        partners,
    })
}

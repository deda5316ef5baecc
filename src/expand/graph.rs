//! Non-overlap compatibility graph and maximal-clique enumeration

use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;

/// Identity of one (tag, candidate) pair within an island.
///
/// Two candidates with the same start, type, and confidence are the same
/// vertex; the first occurrence wins when mapping back to a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct VertexKey {
    pub start_token: usize,
    pub entity_type: String,
    pub confidence: OrderedFloat<f64>,
}

/// Undirected graph over island vertices. An edge means the two spans do not
/// overlap and may appear together in a parse.
#[derive(Debug, Default)]
pub(crate) struct SpanGraph {
    adjacency: AHashMap<VertexKey, AHashSet<VertexKey>>,
}

impl SpanGraph {
    pub fn add_edge(&mut self, a: &VertexKey, b: &VertexKey) {
        self.adjacency
            .entry(a.clone())
            .or_default()
            .insert(b.clone());
        self.adjacency
            .entry(b.clone())
            .or_default()
            .insert(a.clone());
    }

    pub fn are_neighbors(&self, a: &VertexKey, b: &VertexKey) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(b))
    }
}

/// Enumerates every maximal clique via Bron-Kerbosch over (R, P, X).
///
/// Each recursion level works on owned copies of P and X, so sibling calls
/// never alias each other's candidate pools.
pub(crate) fn max_cliques(vertices: Vec<VertexKey>, graph: &SpanGraph) -> Vec<Vec<VertexKey>> {
    let mut out = Vec::new();
    bron_kerbosch(Vec::new(), vertices, Vec::new(), graph, &mut out);
    out
}

fn bron_kerbosch(
    r: Vec<VertexKey>,
    mut p: Vec<VertexKey>,
    mut x: Vec<VertexKey>,
    graph: &SpanGraph,
    out: &mut Vec<Vec<VertexKey>>,
) {
    if p.is_empty() && x.is_empty() {
        out.push(r);
        return;
    }
    for v in p.clone() {
        let mut r_next = r.clone();
        r_next.push(v.clone());
        let p_next = p
            .iter()
            .filter(|u| graph.are_neighbors(&v, u))
            .cloned()
            .collect();
        let x_next = x
            .iter()
            .filter(|u| graph.are_neighbors(&v, u))
            .cloned()
            .collect();
        bron_kerbosch(r_next, p_next, x_next, graph, out);
        p.retain(|u| *u != v);
        x.push(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(start: usize, name: &str) -> VertexKey {
        VertexKey {
            start_token: start,
            entity_type: name.to_string(),
            confidence: OrderedFloat(1.0),
        }
    }

    #[test]
    fn test_triangle_is_one_clique() {
        let (a, b, c) = (vertex(0, "a"), vertex(1, "b"), vertex(2, "c"));
        let mut graph = SpanGraph::default();
        graph.add_edge(&a, &b);
        graph.add_edge(&b, &c);
        graph.add_edge(&a, &c);

        let cliques = max_cliques(vec![a, b, c], &graph);
        assert_eq!(cliques.len(), 1);
        assert_eq!(cliques[0].len(), 3);
    }

    #[test]
    fn test_path_yields_two_cliques() {
        let (a, b, c) = (vertex(0, "a"), vertex(1, "b"), vertex(2, "c"));
        let mut graph = SpanGraph::default();
        graph.add_edge(&a, &b);
        graph.add_edge(&b, &c);

        let mut sizes: Vec<usize> = max_cliques(vec![a, b, c], &graph)
            .iter()
            .map(Vec::len)
            .collect();
        sizes.sort();
        assert_eq!(sizes, vec![2, 2]);
    }

    #[test]
    fn test_edgeless_vertices_are_singleton_cliques() {
        let (a, b) = (vertex(0, "a"), vertex(0, "b"));
        let graph = SpanGraph::default();
        let cliques = max_cliques(vec![a, b], &graph);
        assert_eq!(cliques.len(), 2);
        assert!(cliques.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_no_subset_cliques() {
        // a-b, a-c, b-c, c-d: {a,b,c} and {c,d} are maximal; {a,c} is not.
        let (a, b, c, d) = (vertex(0, "a"), vertex(1, "b"), vertex(2, "c"), vertex(3, "d"));
        let mut graph = SpanGraph::default();
        graph.add_edge(&a, &b);
        graph.add_edge(&a, &c);
        graph.add_edge(&b, &c);
        graph.add_edge(&c, &d);

        let cliques = max_cliques(vec![a, b, c, d], &graph);
        let mut sizes: Vec<usize> = cliques.iter().map(Vec::len).collect();
        sizes.sort();
        assert_eq!(sizes, vec![2, 3]);
    }
}

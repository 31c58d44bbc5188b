//! Undirected dependency graph over entity ids
//!
//! Vertices live in an arena and adjacency is stored as index lists, so the
//! graph never holds owning references between nodes. Edges are not
//! deduplicated: adding the same pair twice yields a parallel edge.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

use super::error::EngineError;
use crate::domain::{Project, ProjectId};

/// An undirected graph keyed by entity id
#[derive(Debug, Clone)]
pub struct DependencyGraph<K = ProjectId> {
    /// Vertex ids, indexed by arena slot
    vertices: Vec<K>,

    /// Map from id to arena slot
    index: HashMap<K, usize>,

    /// Neighbor slots per vertex, in edge insertion order
    adjacency: Vec<Vec<usize>>,
}

impl<K> Default for DependencyGraph<K> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
        }
    }
}

impl DependencyGraph<ProjectId> {
    /// Builds the project relationship graph
    ///
    /// Every project and every id it lists as a dependency becomes a vertex,
    /// whether or not that id names a known project.
    pub fn from_projects<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Self {
        let mut graph = Self::new();
        for project in projects {
            let a = graph.insert_vertex(project.id.clone());
            for dep in &project.dependencies {
                let b = graph.insert_vertex(dep.clone());
                graph.connect(a, b);
            }
        }
        graph
    }
}

impl<K: Clone + Eq + Hash> DependencyGraph<K> {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex; no-op if it already exists
    pub fn add_vertex(&mut self, id: K) {
        self.insert_vertex(id);
    }

    /// Adds an undirected edge between two existing vertices
    pub fn add_edge(&mut self, a: &K, b: &K) -> Result<(), EngineError>
    where
        K: std::fmt::Display,
    {
        let a = self.slot(a)?;
        let b = self.slot(b)?;
        self.connect(a, b);
        Ok(())
    }

    /// Returns true if a cycle is reachable from `start`
    ///
    /// Depth-first search that remembers each vertex's parent; reaching an
    /// already visited vertex other than the parent closes a cycle. Cycles
    /// in components not reachable from `start` are not reported.
    pub fn has_cycle(&self, start: &K) -> bool {
        let Some(&start) = self.index.get(start) else {
            return false;
        };

        let mut visited = vec![false; self.vertices.len()];
        self.cycle_from(start, &mut visited)
    }

    /// Returns true if any connected component contains a cycle
    pub fn has_any_cycle(&self) -> bool {
        let mut visited = vec![false; self.vertices.len()];
        (0..self.vertices.len()).any(|slot| !visited[slot] && self.cycle_from(slot, &mut visited))
    }

    fn cycle_from(&self, start: usize, visited: &mut [bool]) -> bool {
        // Frames: (vertex, parent, next neighbor position)
        let mut stack: Vec<(usize, Option<usize>, usize)> = vec![(start, None, 0)];
        visited[start] = true;

        while let Some(frame) = stack.last_mut() {
            let (vertex, parent, pos) = *frame;
            let Some(&neighbor) = self.adjacency[vertex].get(pos) else {
                stack.pop();
                continue;
            };
            frame.2 += 1;

            if !visited[neighbor] {
                visited[neighbor] = true;
                stack.push((neighbor, Some(vertex), 0));
            } else if Some(neighbor) != parent {
                return true;
            }
        }

        false
    }

    /// Returns the minimum-hop path from `start` to `end`, inclusive
    ///
    /// Breadth-first search; among equally short paths the one found first
    /// by adjacency insertion order wins. `None` if `end` is unreachable or
    /// either endpoint is unknown.
    pub fn shortest_path(&self, start: &K, end: &K) -> Option<Vec<K>> {
        let start = *self.index.get(start)?;
        let end = *self.index.get(end)?;

        let mut came_from: Vec<Option<usize>> = vec![None; self.vertices.len()];
        let mut visited = vec![false; self.vertices.len()];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(current) = queue.pop_front() {
            if current == end {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(prev) = came_from[cursor] {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                return Some(path.into_iter().map(|slot| self.vertices[slot].clone()).collect());
            }

            for &neighbor in &self.adjacency[current] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    came_from[neighbor] = Some(current);
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }

    /// Returns every vertex reachable from `start` in depth-first pre-order
    pub fn reachable(&self, start: &K) -> Vec<K> {
        let Some(&start) = self.index.get(start) else {
            return Vec::new();
        };

        let mut visited = vec![false; self.vertices.len()];
        let mut order = vec![start];
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        visited[start] = true;

        while let Some(frame) = stack.last_mut() {
            let (vertex, pos) = *frame;
            let Some(&neighbor) = self.adjacency[vertex].get(pos) else {
                stack.pop();
                continue;
            };
            frame.1 += 1;

            if !visited[neighbor] {
                visited[neighbor] = true;
                order.push(neighbor);
                stack.push((neighbor, 0));
            }
        }

        order.into_iter().map(|slot| self.vertices[slot].clone()).collect()
    }

    /// Groups vertices into connected components, in vertex insertion order
    pub fn components(&self) -> Vec<Vec<K>> {
        let mut seen: HashSet<K> = HashSet::new();
        let mut components = Vec::new();

        for id in &self.vertices {
            if seen.contains(id) {
                continue;
            }
            let component = self.reachable(id);
            seen.extend(component.iter().cloned());
            components.push(component);
        }

        components
    }

    /// Returns the neighbors of a vertex in insertion order (with repeats
    /// for parallel edges)
    pub fn neighbors(&self, id: &K) -> Vec<K> {
        match self.index.get(id) {
            Some(&slot) => self.adjacency[slot]
                .iter()
                .map(|&n| self.vertices[n].clone())
                .collect(),
            None => vec![],
        }
    }

    /// Returns true if the graph contains the vertex
    pub fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the number of edges, counting parallel edges separately
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Returns all vertex ids in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &K> {
        self.vertices.iter()
    }

    fn insert_vertex(&mut self, id: K) -> usize {
        if let Some(&slot) = self.index.get(&id) {
            return slot;
        }
        let slot = self.vertices.len();
        self.vertices.push(id.clone());
        self.adjacency.push(Vec::new());
        self.index.insert(id, slot);
        slot
    }

    fn slot(&self, id: &K) -> Result<usize, EngineError>
    where
        K: std::fmt::Display,
    {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::UnknownVertex(id.to_string()))
    }

    fn connect(&mut self, a: usize, b: usize) {
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
    }
}

/// Returns dependency ids that name no project in the snapshot
///
/// Each id is reported once, in first-seen order.
pub fn unresolved_dependencies(projects: &[Project]) -> Vec<ProjectId> {
    let known: HashSet<&ProjectId> = projects.iter().map(|p| &p.id).collect();
    let mut reported = HashSet::new();

    projects
        .iter()
        .flat_map(|p| p.dependencies.iter())
        .filter(|dep| !known.contains(dep) && reported.insert(*dep))
        .cloned()
        .collect()
}

//! Graph algorithms for mathgraph
//!
//! Every algorithm runs over a [`GraphView`], a dense CSR snapshot of the
//! topology built once from the application's graph store.

pub mod centrality;
pub mod common;
pub mod community;
pub mod layout;
pub mod modularity;
pub mod topology;

pub use centrality::{eigenvector_centrality, ConvergenceError, EigenvectorConfig};
pub use common::{GraphView, NodeId};
pub use community::{
    strongly_connected_components, weakly_connected_components, ComponentsResult, SccResult,
    WccResult,
};
pub use layout::{spring_layout, LayoutConfig};
pub use modularity::{greedy_modularity_communities, modularity, CommunityConfig, CommunityResult};
pub use topology::{average_clustering, clustering_coefficients, count_triangles};

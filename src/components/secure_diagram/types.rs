use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeId {
	Client,
	PrivateAuth,
	PrivateAi,
	EncryptedStorage,
}

impl NodeId {
	pub const ALL: [NodeId; 4] = [
		NodeId::Client,
		NodeId::PrivateAuth,
		NodeId::PrivateAi,
		NodeId::EncryptedStorage,
	];

	pub fn class_name(self) -> &'static str {
		match self {
			NodeId::Client => "client",
			NodeId::PrivateAuth => "keymgmt",
			NodeId::PrivateAi => "aiinf",
			NodeId::EncryptedStorage => "storage",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			NodeId::Client => "CLIENT",
			NodeId::PrivateAuth => "PRIVATE AUTH",
			NodeId::PrivateAi => "PRIVATE AI",
			NodeId::EncryptedStorage => "ENCRYPTED STORAGE",
		}
	}

	fn index(self) -> usize {
		match self {
			NodeId::Client => 0,
			NodeId::PrivateAuth => 1,
			NodeId::PrivateAi => 2,
			NodeId::EncryptedStorage => 3,
		}
	}
}

/// A fixed link between the client and one peripheral node, in visiting order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectorId {
	ClientAuth,
	ClientAi,
	ClientStorage,
}

impl ConnectorId {
	pub const ALL: [ConnectorId; 3] = [
		ConnectorId::ClientAuth,
		ConnectorId::ClientAi,
		ConnectorId::ClientStorage,
	];

	pub fn central(self) -> NodeId {
		NodeId::Client
	}

	pub fn peripheral(self) -> NodeId {
		match self {
			ConnectorId::ClientAuth => NodeId::PrivateAuth,
			ConnectorId::ClientAi => NodeId::PrivateAi,
			ConnectorId::ClientStorage => NodeId::EncryptedStorage,
		}
	}

	pub fn element_id(self) -> &'static str {
		match self {
			ConnectorId::ClientAuth => "conn1",
			ConnectorId::ClientAi => "conn2",
			ConnectorId::ClientStorage => "conn3",
		}
	}

	pub(crate) fn index(self) -> usize {
		match self {
			ConnectorId::ClientAuth => 0,
			ConnectorId::ClientAi => 1,
			ConnectorId::ClientStorage => 2,
		}
	}
}

impl fmt::Display for ConnectorId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{:?}-{:?} connector",
			self.central(),
			self.peripheral()
		)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementId {
	Node(NodeId),
	Line(ConnectorId),
	Marker,
}

impl ElementId {
	pub const MARKER_CLASS: &'static str = "packet";

	pub const ALL: [ElementId; 8] = [
		ElementId::Node(NodeId::Client),
		ElementId::Node(NodeId::PrivateAuth),
		ElementId::Node(NodeId::PrivateAi),
		ElementId::Node(NodeId::EncryptedStorage),
		ElementId::Line(ConnectorId::ClientAuth),
		ElementId::Line(ConnectorId::ClientAi),
		ElementId::Line(ConnectorId::ClientStorage),
		ElementId::Marker,
	];

	pub fn selector(self) -> String {
		match self {
			ElementId::Node(node) => format!(".{}", node.class_name()),
			ElementId::Line(connector) => format!("#{}", connector.element_id()),
			ElementId::Marker => format!(".{}", Self::MARKER_CLASS),
		}
	}
}

impl fmt::Display for ElementId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ElementId::Node(node) => write!(f, "{node:?} node"),
			ElementId::Line(connector) => write!(f, "{connector} line"),
			ElementId::Marker => f.write_str("marker"),
		}
	}
}

/// Emphasis flag per node. Transient, owned by the cycle orchestrator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Highlights([bool; 4]);

impl Highlights {
	pub fn is_on(&self, node: NodeId) -> bool {
		self.0[node.index()]
	}

	pub fn set(&mut self, node: NodeId, on: bool) {
		self.0[node.index()] = on;
	}

	#[cfg(test)]
	pub fn any(&self) -> bool {
		self.0.iter().any(|&on| on)
	}
}

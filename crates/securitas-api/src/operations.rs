// Remote operation catalogue
//
// Each operation is described once and can be composed into either wire
// shape: a GraphQL document posted to the base URL, or a REST verb + path.
// `field` names the key the result lives under (inside `data` for GraphQL,
// at the top level for REST). `keys` lists the members a bare REST payload
// must carry, any one of them, to be read as the result itself.

use serde_json::Value;

/// HTTP verb used by the REST shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

/// Static description of one remote operation.
#[derive(Debug)]
pub struct OperationSpec {
    pub name: &'static str,
    pub field: &'static str,
    pub keys: &'static [&'static str],
    pub query: &'static str,
    pub verb: Verb,
    pub path: &'static str,
}

pub const LOGIN: OperationSpec = OperationSpec {
    name: "mkLoginToken",
    field: "xSLoginToken",
    keys: &["res", "hash"],
    query: "mutation mkLoginToken($user: String!, $password: String!, $id: String!, \
$country: String!, $lang: String!, $callby: String!, $idDevice: String!, \
$idDeviceIndigitall: String!, $deviceType: String!, $deviceVersion: String!, \
$deviceResolution: String!, $deviceName: String!, $deviceBrand: String!, \
$deviceOsVersion: String!, $uuid: String!) { xSLoginToken(user: $user, password: $password, \
id: $id, country: $country, lang: $lang, callby: $callby, idDevice: $idDevice, \
idDeviceIndigitall: $idDeviceIndigitall, deviceType: $deviceType, \
deviceVersion: $deviceVersion, deviceResolution: $deviceResolution, \
deviceName: $deviceName, deviceBrand: $deviceBrand, deviceOsVersion: $deviceOsVersion, \
uuid: $uuid) { __typename res msg hash refreshToken legals changePassword \
needDeviceAuthorization mainUser } }",
    verb: Verb::Post,
    path: "/login",
};

pub const LIST_INSTALLATIONS: OperationSpec = OperationSpec {
    name: "mkInstallationList",
    field: "xSInstallations",
    keys: &["installations"],
    query: "query mkInstallationList { xSInstallations { installations { numinst alias \
panel type name surname address city postcode province email phone } } }",
    verb: Verb::Get,
    path: "/installations",
};

pub const STATUS: OperationSpec = OperationSpec {
    name: "Status",
    field: "xSStatus",
    keys: &["status"],
    query: "query Status($numinst: String!) { xSStatus(numinst: $numinst) { status \
timestampUpdate exceptions { status deviceType alias } } }",
    verb: Verb::Post,
    path: "/status",
};

pub const ARM_PANEL: OperationSpec = OperationSpec {
    name: "xSArmPanel",
    field: "xSArmPanel",
    keys: &["res"],
    query: "mutation xSArmPanel($numinst: String!, $request: ArmCodeRequest!, \
$panel: String!, $currentStatus: String) { xSArmPanel(numinst: $numinst, request: $request, \
panel: $panel, currentStatus: $currentStatus) { res msg referenceId } }",
    verb: Verb::Post,
    path: "/arm",
};

pub const DISARM_PANEL: OperationSpec = OperationSpec {
    name: "xSDisarmPanel",
    field: "xSDisarmPanel",
    keys: &["res"],
    query: "mutation xSDisarmPanel($numinst: String!, $request: DisarmCodeRequest!, \
$panel: String!) { xSDisarmPanel(numinst: $numinst, request: $request, panel: $panel) \
{ res msg referenceId } }",
    verb: Verb::Post,
    path: "/disarm",
};

/// An operation bound to its variables, ready for the executor.
#[derive(Debug, Clone)]
pub struct Operation {
    spec: &'static OperationSpec,
    variables: Value,
}

impl Operation {
    /// Bind `variables` (a JSON object) to `spec`.
    pub fn new(spec: &'static OperationSpec, variables: Value) -> Self {
        Self { spec, variables }
    }

    /// An operation without variables.
    pub fn bare(spec: &'static OperationSpec) -> Self {
        Self::new(spec, Value::Object(serde_json::Map::new()))
    }

    pub fn spec(&self) -> &'static OperationSpec {
        self.spec
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn variables(&self) -> &Value {
        &self.variables
    }
}

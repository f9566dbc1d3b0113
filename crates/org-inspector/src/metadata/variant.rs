use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of configuration item shapes known to the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityVariant {
    ApexClass,
    ApexTrigger,
    Application,
    AppPermission,
    CustomLabel,
    CustomTab,
    Dashboard,
    Document,
    EmailTemplate,
    Field,
    FieldSet,
    Flow,
    FlowVersion,
    Group,
    HomePageComponent,
    LightningAuraComponent,
    LightningPage,
    LightningWebComponent,
    Limit,
    Object,
    ObjectPermission,
    ObjectType,
    Organization,
    PageLayout,
    PermissionSet,
    PermissionSetLicense,
    Profile,
    ProfilePasswordPolicy,
    ProfileRestrictions,
    RecordType,
    Report,
    User,
    UserRole,
    ValidationRule,
    VisualForceComponent,
    VisualForcePage,
    WebLink,
    Workflow,
}

/// Capabilities and schema of a variant. Plain data, resolved by table lookup.
#[derive(Debug)]
pub struct VariantDescriptor {
    pub name: &'static str,
    pub label: Option<&'static str>,
    pub scoring: bool,
    pub dependencies: bool,
    pub fields: &'static [&'static str],
}

impl VariantDescriptor {
    pub fn position(&self, property: &str) -> Option<usize> {
        self.fields.iter().position(|field| *field == property)
    }

    pub fn declares(&self, property: &str) -> bool {
        self.position(property).is_some()
    }
}

impl EntityVariant {
    pub const ALL: [Self; 38] = [
        Self::ApexClass,
        Self::ApexTrigger,
        Self::Application,
        Self::AppPermission,
        Self::CustomLabel,
        Self::CustomTab,
        Self::Dashboard,
        Self::Document,
        Self::EmailTemplate,
        Self::Field,
        Self::FieldSet,
        Self::Flow,
        Self::FlowVersion,
        Self::Group,
        Self::HomePageComponent,
        Self::LightningAuraComponent,
        Self::LightningPage,
        Self::LightningWebComponent,
        Self::Limit,
        Self::Object,
        Self::ObjectPermission,
        Self::ObjectType,
        Self::Organization,
        Self::PageLayout,
        Self::PermissionSet,
        Self::PermissionSetLicense,
        Self::Profile,
        Self::ProfilePasswordPolicy,
        Self::ProfileRestrictions,
        Self::RecordType,
        Self::Report,
        Self::User,
        Self::UserRole,
        Self::ValidationRule,
        Self::VisualForceComponent,
        Self::VisualForcePage,
        Self::WebLink,
        Self::Workflow,
    ];

    pub fn descriptor(self) -> &'static VariantDescriptor {
        match self {
            Self::ApexClass => &APEX_CLASS,
            Self::ApexTrigger => &APEX_TRIGGER,
            Self::Application => &APPLICATION,
            Self::AppPermission => &APP_PERMISSION,
            Self::CustomLabel => &CUSTOM_LABEL,
            Self::CustomTab => &CUSTOM_TAB,
            Self::Dashboard => &DASHBOARD,
            Self::Document => &DOCUMENT,
            Self::EmailTemplate => &EMAIL_TEMPLATE,
            Self::Field => &FIELD,
            Self::FieldSet => &FIELD_SET,
            Self::Flow => &FLOW,
            Self::FlowVersion => &FLOW_VERSION,
            Self::Group => &GROUP,
            Self::HomePageComponent => &HOME_PAGE_COMPONENT,
            Self::LightningAuraComponent => &LIGHTNING_AURA_COMPONENT,
            Self::LightningPage => &LIGHTNING_PAGE,
            Self::LightningWebComponent => &LIGHTNING_WEB_COMPONENT,
            Self::Limit => &LIMIT,
            Self::Object => &OBJECT,
            Self::ObjectPermission => &OBJECT_PERMISSION,
            Self::ObjectType => &OBJECT_TYPE,
            Self::Organization => &ORGANIZATION,
            Self::PageLayout => &PAGE_LAYOUT,
            Self::PermissionSet => &PERMISSION_SET,
            Self::PermissionSetLicense => &PERMISSION_SET_LICENSE,
            Self::Profile => &PROFILE,
            Self::ProfilePasswordPolicy => &PROFILE_PASSWORD_POLICY,
            Self::ProfileRestrictions => &PROFILE_RESTRICTIONS,
            Self::RecordType => &RECORD_TYPE,
            Self::Report => &REPORT,
            Self::User => &USER,
            Self::UserRole => &USER_ROLE,
            Self::ValidationRule => &VALIDATION_RULE,
            Self::VisualForceComponent => &VISUALFORCE_COMPONENT,
            Self::VisualForcePage => &VISUALFORCE_PAGE,
            Self::WebLink => &WEB_LINK,
            Self::Workflow => &WORKFLOW,
        }
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn has_scoring(self) -> bool {
        self.descriptor().scoring
    }

    pub fn has_dependencies(self) -> bool {
        self.descriptor().dependencies
    }

    pub fn fields(self) -> &'static [&'static str] {
        self.descriptor().fields
    }

    /// Human label, falling back to the internal name when none is declared.
    pub fn label(self) -> &'static str {
        let descriptor = self.descriptor();
        match descriptor.label {
            Some(label) => label,
            None => {
                tracing::warn!(
                    variant = descriptor.name,
                    "entity variant declares no label, using its internal name"
                );
                descriptor.name
            }
        }
    }
}

impl fmt::Display for EntityVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised when a variant name does not match any known shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a known entity variant")]
pub struct UnknownVariant(pub String);

impl FromStr for EntityVariant {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.name() == value)
            .ok_or_else(|| UnknownVariant(value.to_string()))
    }
}

static APEX_CLASS: VariantDescriptor = VariantDescriptor {
    name: "ApexClass",
    label: Some("Apex Class"),
    scoring: true,
    dependencies: true,
    fields: &[
        "id",
        "name",
        "url",
        "package",
        "apiVersion",
        "isTest",
        "isClass",
        "isEnum",
        "isInterface",
        "isAbstract",
        "isScheduled",
        "isSchedulable",
        "specifiedSharing",
        "needsRecompilation",
        "coverage",
        "testFailedMethods",
        "testPassedMethods",
        "nbSystemAsserts",
        "hardCodedURLs",
        "hardCodedIDs",
        "length",
        "relatedTestClassIds",
        "relatedTestClassRefs",
        "createdDate",
        "lastModifiedDate",
    ],
};

static APEX_TRIGGER: VariantDescriptor = VariantDescriptor {
    name: "ApexTrigger",
    label: Some("Apex Trigger"),
    scoring: true,
    dependencies: true,
    fields: &[
        "id",
        "name",
        "url",
        "package",
        "apiVersion",
        "isActive",
        "hasSOQL",
        "hasDML",
        "length",
        "hardCodedURLs",
        "hardCodedIDs",
        "objectId",
        "objectRef",
        "createdDate",
        "lastModifiedDate",
    ],
};

static APPLICATION: VariantDescriptor = VariantDescriptor {
    name: "Application",
    label: Some("Application"),
    scoring: false,
    dependencies: false,
    fields: &["id", "name", "label", "package"],
};

static APP_PERMISSION: VariantDescriptor = VariantDescriptor {
    name: "AppPermission",
    label: Some("Application Permission"),
    scoring: false,
    dependencies: false,
    fields: &[
        "parentId",
        "parentRef",
        "appId",
        "appRef",
        "isAccessible",
        "isVisible",
    ],
};

static CUSTOM_LABEL: VariantDescriptor = VariantDescriptor {
    name: "CustomLabel",
    label: Some("Custom Label"),
    scoring: true,
    dependencies: true,
    fields: &[
        "id",
        "name",
        "url",
        "package",
        "label",
        "category",
        "isProtected",
        "language",
        "value",
        "createdDate",
        "lastModifiedDate",
    ],
};

static CUSTOM_TAB: VariantDescriptor = VariantDescriptor {
    name: "CustomTab",
    label: Some("Custom Tab"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "url",
        "package",
        "type",
        "description",
        "hardCodedURLs",
        "hardCodedIDs",
        "createdDate",
        "lastModifiedDate",
    ],
};

static DASHBOARD: VariantDescriptor = VariantDescriptor {
    name: "Dashboard",
    label: Some("Dashboard"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "title",
        "url",
        "type",
        "package",
        "description",
        "lastViewedDate",
        "lastRefreshDate",
        "createdDate",
        "lastModifiedDate",
    ],
};

static DOCUMENT: VariantDescriptor = VariantDescriptor {
    name: "Document",
    label: Some("Document"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "url",
        "documentUrl",
        "isHardCodedURL",
        "folderName",
        "size",
        "type",
        "description",
        "createdDate",
        "lastModifiedDate",
    ],
};

static EMAIL_TEMPLATE: VariantDescriptor = VariantDescriptor {
    name: "EmailTemplate",
    label: Some("Email Template"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "url",
        "package",
        "apiVersion",
        "isActive",
        "folderName",
        "description",
        "lastUsedDate",
        "hardCodedURLs",
        "hardCodedIDs",
        "createdDate",
        "lastModifiedDate",
    ],
};

static FIELD: VariantDescriptor = VariantDescriptor {
    name: "Field",
    label: Some("Standard or Custom Field"),
    scoring: true,
    dependencies: true,
    fields: &[
        "id",
        "name",
        "label",
        "url",
        "package",
        "description",
        "isCustom",
        "tooltip",
        "type",
        "length",
        "isUnique",
        "isEncrypted",
        "isExternalId",
        "isIndexed",
        "defaultValue",
        "formula",
        "hardCodedURLs",
        "hardCodedIDs",
        "objectId",
        "objectRef",
        "createdDate",
        "lastModifiedDate",
    ],
};

static FIELD_SET: VariantDescriptor = VariantDescriptor {
    name: "FieldSet",
    label: Some("Field Set"),
    scoring: true,
    dependencies: false,
    fields: &["id", "name", "label", "url", "description", "objectId", "objectRef"],
};

static FLOW: VariantDescriptor = VariantDescriptor {
    name: "Flow",
    label: Some("Flow or Process Builder"),
    scoring: true,
    dependencies: true,
    fields: &[
        "id",
        "name",
        "url",
        "apiVersion",
        "description",
        "type",
        "isVersionActive",
        "versionsCount",
        "currentVersionId",
        "currentVersionRef",
        "isProcessBuilder",
        "createdDate",
        "lastModifiedDate",
    ],
};

static FLOW_VERSION: VariantDescriptor = VariantDescriptor {
    name: "FlowVersion",
    label: Some("Flow Version"),
    scoring: false,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "url",
        "version",
        "apiVersion",
        "description",
        "type",
        "isActive",
        "totalNodeCount",
        "createdDate",
        "lastModifiedDate",
    ],
};

static GROUP: VariantDescriptor = VariantDescriptor {
    name: "Group",
    label: Some("Public Group or Queue"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "developerName",
        "url",
        "type",
        "isPublicGroup",
        "isQueue",
        "directUserIds",
        "directUserRefs",
        "directGroupIds",
        "directGroupRefs",
        "includeBosses",
        "includeSubordinates",
        "relatedId",
    ],
};

static HOME_PAGE_COMPONENT: VariantDescriptor = VariantDescriptor {
    name: "HomePageComponent",
    label: Some("Home Page Component"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "url",
        "package",
        "isBodyEmpty",
        "hardCodedURLs",
        "hardCodedIDs",
        "createdDate",
        "lastModifiedDate",
    ],
};

static LIGHTNING_AURA_COMPONENT: VariantDescriptor = VariantDescriptor {
    name: "LightningAuraComponent",
    label: Some("Aura Component"),
    scoring: true,
    dependencies: true,
    fields: &[
        "id",
        "name",
        "url",
        "apiVersion",
        "package",
        "description",
        "createdDate",
        "lastModifiedDate",
    ],
};

static LIGHTNING_PAGE: VariantDescriptor = VariantDescriptor {
    name: "LightningPage",
    label: Some("Lightning Page"),
    scoring: true,
    dependencies: true,
    fields: &[
        "id",
        "name",
        "url",
        "type",
        "package",
        "description",
        "objectId",
        "objectRef",
        "createdDate",
        "lastModifiedDate",
    ],
};

static LIGHTNING_WEB_COMPONENT: VariantDescriptor = VariantDescriptor {
    name: "LightningWebComponent",
    label: Some("Lightning Web Component"),
    scoring: true,
    dependencies: true,
    fields: &[
        "id",
        "name",
        "url",
        "apiVersion",
        "package",
        "description",
        "createdDate",
        "lastModifiedDate",
    ],
};

static LIMIT: VariantDescriptor = VariantDescriptor {
    name: "Limit",
    label: Some("Org Limit"),
    scoring: false,
    dependencies: false,
    fields: &[
        "id",
        "label",
        "type",
        "max",
        "used",
        "remaining",
        "usedPercentage",
    ],
};

static OBJECT: VariantDescriptor = VariantDescriptor {
    name: "Object",
    label: Some("Standard or Custom Object"),
    scoring: false,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "label",
        "labelPlural",
        "description",
        "url",
        "package",
        "isCustom",
        "keyPrefix",
        "typeId",
        "typeRef",
        "externalSharingModel",
        "internalSharingModel",
        "fieldsCount",
        "recordTypesCount",
        "pageLayoutsCount",
        "validationRulesCount",
    ],
};

static OBJECT_PERMISSION: VariantDescriptor = VariantDescriptor {
    name: "ObjectPermission",
    label: Some("Object Permission"),
    scoring: false,
    dependencies: false,
    fields: &[
        "parentId",
        "parentRef",
        "objectType",
        "isRead",
        "isCreate",
        "isEdit",
        "isDelete",
        "isViewAll",
        "isModifyAll",
    ],
};

static OBJECT_TYPE: VariantDescriptor = VariantDescriptor {
    name: "ObjectType",
    label: None,
    scoring: false,
    dependencies: false,
    fields: &["id", "label"],
};

static ORGANIZATION: VariantDescriptor = VariantDescriptor {
    name: "Organization",
    label: Some("Organization"),
    scoring: false,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "type",
        "isDeveloperEdition",
        "isSandbox",
        "isTrial",
        "isProduction",
        "localNamespace",
    ],
};

static PAGE_LAYOUT: VariantDescriptor = VariantDescriptor {
    name: "PageLayout",
    label: Some("Page Layout"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "type",
        "url",
        "profileAssignmentCount",
        "objectId",
        "objectRef",
        "createdDate",
        "lastModifiedDate",
    ],
};

static PERMISSION_SET: VariantDescriptor = VariantDescriptor {
    name: "PermissionSet",
    label: Some("Permission Set or Permission Set Group"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "description",
        "url",
        "license",
        "isCustom",
        "package",
        "memberCounts",
        "isGroup",
        "type",
        "nbFieldPermissions",
        "nbObjectPermissions",
        "importantPermissions",
        "isAdminLike",
        "createdDate",
        "lastModifiedDate",
    ],
};

static PERMISSION_SET_LICENSE: VariantDescriptor = VariantDescriptor {
    name: "PermissionSetLicense",
    label: Some("Permission Set License"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "url",
        "status",
        "totalCount",
        "usedCount",
        "remainingCount",
        "usedPercentage",
        "distinctActiveAssigneeCount",
        "permissionSetIds",
        "permissionSetRefs",
        "expirationDate",
        "createdDate",
        "lastModifiedDate",
    ],
};

static PROFILE: VariantDescriptor = VariantDescriptor {
    name: "Profile",
    label: Some("Profile"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "description",
        "url",
        "license",
        "isCustom",
        "package",
        "memberCounts",
        "type",
        "nbFieldPermissions",
        "nbObjectPermissions",
        "importantPermissions",
        "isAdminLike",
        "createdDate",
        "lastModifiedDate",
    ],
};

static PROFILE_PASSWORD_POLICY: VariantDescriptor = VariantDescriptor {
    name: "ProfilePasswordPolicy",
    label: Some("Password Policy"),
    scoring: true,
    dependencies: false,
    fields: &[
        "profileName",
        "lockoutInterval",
        "maxLoginAttempts",
        "minimumPasswordLength",
        "minimumPasswordLifetime",
        "obscure",
        "passwordComplexity",
        "passwordExpiration",
        "passwordHistory",
        "passwordQuestion",
    ],
};

static PROFILE_RESTRICTIONS: VariantDescriptor = VariantDescriptor {
    name: "ProfileRestrictions",
    label: None,
    scoring: true,
    dependencies: false,
    fields: &["profileId", "profileRef", "ipRanges", "loginHours"],
};

static RECORD_TYPE: VariantDescriptor = VariantDescriptor {
    name: "RecordType",
    label: Some("Record Type"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "developerName",
        "url",
        "description",
        "isActive",
        "isAvailable",
        "isDefault",
        "isMaster",
        "objectId",
        "objectRef",
    ],
};

static REPORT: VariantDescriptor = VariantDescriptor {
    name: "Report",
    label: Some("Report"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "url",
        "format",
        "folderName",
        "package",
        "description",
        "lastRunDate",
        "createdDate",
        "lastModifiedDate",
    ],
};

static USER: VariantDescriptor = VariantDescriptor {
    name: "User",
    label: Some("User"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "url",
        "name",
        "lastLogin",
        "numberFailedLogins",
        "onLightningExperience",
        "lastPasswordChange",
        "profileId",
        "profileRef",
        "permissionSetIds",
        "permissionSetRefs",
        "hasMfaByPass",
        "isAdminLike",
    ],
};

static USER_ROLE: VariantDescriptor = VariantDescriptor {
    name: "UserRole",
    label: Some("Role"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "apiname",
        "url",
        "parentId",
        "parentRef",
        "hasParent",
        "activeMembersCount",
        "activeMemberIds",
        "activeMemberRefs",
    ],
};

static VALIDATION_RULE: VariantDescriptor = VariantDescriptor {
    name: "ValidationRule",
    label: Some("Validation Rule"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "url",
        "package",
        "isActive",
        "description",
        "errorDisplayField",
        "errorMessage",
        "hardCodedURLs",
        "hardCodedIDs",
        "objectId",
        "objectRef",
        "createdDate",
        "lastModifiedDate",
    ],
};

static VISUALFORCE_COMPONENT: VariantDescriptor = VariantDescriptor {
    name: "VisualForceComponent",
    label: Some("Visualforce Component"),
    scoring: true,
    dependencies: true,
    fields: &[
        "id",
        "name",
        "url",
        "apiVersion",
        "package",
        "description",
        "hardCodedURLs",
        "hardCodedIDs",
        "createdDate",
        "lastModifiedDate",
    ],
};

static VISUALFORCE_PAGE: VariantDescriptor = VariantDescriptor {
    name: "VisualForcePage",
    label: Some("Visualforce Page"),
    scoring: true,
    dependencies: true,
    fields: &[
        "id",
        "name",
        "url",
        "apiVersion",
        "package",
        "description",
        "isMobileReady",
        "hardCodedURLs",
        "hardCodedIDs",
        "createdDate",
        "lastModifiedDate",
    ],
};

static WEB_LINK: VariantDescriptor = VariantDescriptor {
    name: "WebLink",
    label: Some("Web Link"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "url",
        "package",
        "type",
        "behavior",
        "description",
        "hardCodedURLs",
        "hardCodedIDs",
        "objectId",
        "objectRef",
        "createdDate",
        "lastModifiedDate",
    ],
};

static WORKFLOW: VariantDescriptor = VariantDescriptor {
    name: "Workflow",
    label: Some("Workflow Rule"),
    scoring: true,
    dependencies: false,
    fields: &[
        "id",
        "name",
        "url",
        "description",
        "isActive",
        "actions",
        "futureActions",
        "emptyTimeTriggers",
        "hasAction",
        "createdDate",
        "lastModifiedDate",
    ],
};

//! Metadata documents shared by unit tests

/// v3 service (EDMX 1.0, DataServiceVersion 3.0) using associations
pub const V3_METADATA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="1.0" xmlns:edmx="http://schemas.microsoft.com/ado/2007/06/edmx">
  <edmx:DataServices m:DataServiceVersion="3.0" xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata">
    <Schema Namespace="ODataDemo" xmlns="http://schemas.microsoft.com/ado/2009/11/edm">
      <EntityType Name="Product">
        <Key>
          <PropertyRef Name="ID" />
        </Key>
        <Property Name="ID" Type="Edm.Int32" Nullable="false" />
        <Property Name="Name" Type="Edm.String" />
        <Property Name="ReleaseDate" Type="Edm.DateTime" Nullable="false" />
        <Property Name="Rating" Type="Edm.Int32" Nullable="false" ConcurrencyMode="Fixed" />
        <Property Name="Price" Type="Edm.Decimal" Nullable="false" />
        <NavigationProperty Name="Category" Relationship="ODataDemo.Product_Category_Category_Products" ToRole="Category_Products" FromRole="Product_Category" />
        <NavigationProperty Name="Supplier" Relationship="ODataDemo.Product_Supplier_Supplier_Products" ToRole="Supplier_Products" FromRole="Product_Supplier" />
      </EntityType>
      <EntityType Name="FeaturedProduct" BaseType="ODataDemo.Product">
        <Property Name="Advertisement" Type="Edm.String" />
      </EntityType>
      <EntityType Name="Category">
        <Key>
          <PropertyRef Name="ID" />
        </Key>
        <Property Name="ID" Type="Edm.Int32" Nullable="false" />
        <Property Name="Name" Type="Edm.String" />
        <NavigationProperty Name="Products" Relationship="ODataDemo.Product_Category_Category_Products" ToRole="Product_Category" FromRole="Category_Products" />
      </EntityType>
      <EntityType Name="Supplier">
        <Key>
          <PropertyRef Name="ID" />
        </Key>
        <Property Name="ID" Type="Edm.Int32" Nullable="false" />
        <Property Name="Name" Type="Edm.String" />
      </EntityType>
      <Association Name="Product_Category_Category_Products">
        <End Type="ODataDemo.Category" Role="Category_Products" Multiplicity="0..1" />
        <End Type="ODataDemo.Product" Role="Product_Category" Multiplicity="*" />
      </Association>
      <Association Name="Product_Supplier_Supplier_Products">
        <End Type="ODataDemo.Supplier" Role="Supplier_Products" Multiplicity="0..1" />
        <End Type="ODataDemo.Product" Role="Product_Supplier" Multiplicity="*" />
      </Association>
      <EntityContainer Name="DemoService" m:IsDefaultEntityContainer="true">
        <EntitySet Name="Products" EntityType="ODataDemo.Product" />
        <EntitySet Name="Categories" EntityType="ODataDemo.Category" />
        <EntitySet Name="Suppliers" EntityType="ODataDemo.Supplier" />
        <AssociationSet Name="Products_Category_Categories" Association="ODataDemo.Product_Category_Category_Products">
          <End Role="Product_Category" EntitySet="Products" />
          <End Role="Category_Products" EntitySet="Categories" />
        </AssociationSet>
        <FunctionImport Name="GetProductsByRating" EntitySet="Products" ReturnType="Collection(ODataDemo.Product)" m:HttpMethod="GET">
          <Parameter Name="rating" Type="Edm.Int32" Nullable="false" />
        </FunctionImport>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;

/// v4 service with a three-level type hierarchy and `Partner` navigation
pub const V4_METADATA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
  <edmx:DataServices>
    <Schema Namespace="Demo" Alias="Self" xmlns="http://docs.oasis-open.org/odata/ns/edm">
      <EntityType Name="Item" Abstract="true">
        <Key>
          <PropertyRef Name="Id" />
        </Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false" />
        <Property Name="Name" Type="Edm.String" />
      </EntityType>
      <EntityType Name="Product" BaseType="Self.Item">
        <Property Name="Price" Type="Edm.Decimal" />
        <Property Name="Rating" Type="Edm.Int32" />
        <NavigationProperty Name="Category" Type="Demo.Category" Partner="Products" />
      </EntityType>
      <EntityType Name="Book" BaseType="Demo.Product">
        <Property Name="Isbn" Type="Edm.String" />
      </EntityType>
      <EntityType Name="Gadget" BaseType="Demo.Product">
        <Property Name="Voltage" Type="Edm.Int32" />
      </EntityType>
      <EntityType Name="Ebook" BaseType="Demo.Book">
        <Property Name="FileSize" Type="Edm.Int64" />
      </EntityType>
      <EntityType Name="Category">
        <Key>
          <PropertyRef Name="Id" />
        </Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false" />
        <Property Name="Name" Type="Edm.String" />
        <NavigationProperty Name="Products" Type="Collection(Demo.Product)" Partner="Category" />
      </EntityType>
      <EntityType Name="Customer">
        <Key>
          <PropertyRef Name="CustomerId" />
        </Key>
        <Property Name="CustomerId" Type="Edm.String" Nullable="false" />
        <Property Name="CompanyName" Type="Edm.String" />
        <NavigationProperty Name="Orders" Type="Collection(Demo.Order)" Partner="Customer" />
      </EntityType>
      <EntityType Name="Order">
        <Key>
          <PropertyRef Name="OrderId" />
        </Key>
        <Property Name="OrderId" Type="Edm.Int32" Nullable="false" />
        <Property Name="OrderDate" Type="Edm.DateTimeOffset" />
        <NavigationProperty Name="Customer" Type="Demo.Customer" Nullable="false" Partner="Orders" />
        <NavigationProperty Name="Lines" Type="Collection(Demo.Product)" />
      </EntityType>
      <EntityType Name="Note">
        <Property Name="Text" Type="Edm.String" />
      </EntityType>
      <EntityType Name="Ghost">
        <Key>
          <PropertyRef Name="Id" />
        </Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false" />
      </EntityType>
      <Function Name="GetBestSellers">
        <Parameter Name="top" Type="Edm.Int32" />
        <ReturnType Type="Collection(Demo.Product)" />
      </Function>
      <EntityContainer Name="Container">
        <EntitySet Name="Products" EntityType="Demo.Product">
          <NavigationPropertyBinding Path="Category" Target="Categories" />
        </EntitySet>
        <EntitySet Name="Categories" EntityType="Demo.Category" />
        <EntitySet Name="Customers" EntityType="Demo.Customer" />
        <EntitySet Name="Orders" EntityType="Demo.Order" />
        <EntitySet Name="Notes" EntityType="Demo.Note" />
        <FunctionImport Name="GetBestSellers" Function="Demo.GetBestSellers" EntitySet="Products" />
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;

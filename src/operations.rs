//! Named remote operations of a [`Database`].
//!
//! Every operation is a thin pass-through to [`Database::invoke`]: frame
//! arguments are reduced to their ids, other arguments are encoded as they
//! are, and the answer is decoded under the operation's declared [`Shape`].
//! Keyword arguments that are `None` are left for the engine to default.
//!
//! ```no_run
//! # fn main() -> cycframe::Result<()> {
//! use cycframe::{Database, TcpChannel, Value};
//! use std::time::Duration;
//!
//! let channel = TcpChannel::new("localhost", 5008, Duration::from_secs(360))?;
//! let ecoli = Database::open("ecoli", channel)?;
//! let genes = ecoli.genes_of_reaction("RXN0-5073")?;
//! let hole = ecoli.pathway_hole_p("PWY0-1299", Some(Value::Bool(true)))?;
//! # Ok(())
//! # }
//! ```

use crate::codec::Shape;
use crate::database::Database;
use crate::error::Result;
use crate::ident::AsFrameId;
use crate::invoke::Call;
use crate::value::Value;

// shape name(frame args; value args) { keyword args } ;
macro_rules! remote_operations {
    ($(
        $(#[$meta:meta])*
        $shape:ident $name:ident = $op:literal
            ( $($frame:ident),* $(; $($value:ident),+)? )
            $({ $($kw:ident : $kwname:literal),+ })? ;
    )*) => {
        impl Database {
            $(
                $(#[$meta])*
                #[allow(clippy::too_many_arguments)]
                pub fn $name(
                    &self,
                    $($frame: impl AsFrameId,)*
                    $($($value: impl Into<Value>,)+)?
                    $($($kw: Option<Value>,)+)?
                ) -> Result<Value> {
                    let call = Call::new($op)
                        $(.arg($frame.frame_id()))*
                        $($(.arg($value))+)?
                        $($(.keyword_opt($kwname, $kw))+)?;
                    self.invoke(&call, Shape::$shape)
                }
            )*
        }
    };
}

remote_operations! {
    // ------------- Reactions -------------
    /// Substrates of all the given reactions.
    Sequence all_substrates = "all-substrates" (; rxns);
    Sequence all_cofactors = "all-cofactors" ();
    Sequence all_modulators = "all-modulators" ();
    Sequence all_sigma_factors = "all-sigma-factors" ();
    Sequence all_operons = "all-operons" ();
    Sequence all_transporters = "all-transporters" ();
    Sequence all_transported_chemicals = "all-transported-chemicals" () {
        from_compartment: "from-compartment",
        to_compartment: "to-compartment",
        primary_only: "primary-only?"
    };
    Sequence all_transcription_factors = "all-transcription-factors" () {
        allow_modified_forms: "allow-modified-forms?"
    };
    Sequence all_genetic_regulation_proteins = "all-genetic-regulation-proteins" () {
        allow_modified_forms: "allow-modified-forms",
        class_name: "class"
    };
    Sequence rxns_w_isozymes = "rxns-w-isozymes" () { rxns: "rxns" };
    Sequence rxns_catalyzed_by_complex = "rxns-catalyzed-by-complex" () { rxns: "rxns" };
    Sequence all_enzymes = "all-enzymes" () { kind: "type" };
    Sequence genes_of_reaction = "genes-of-reaction" (rxn);
    Sequence substrates_of_reaction = "substrates-of-reaction" (rxn);
    Sequence enzymes_of_reaction = "enzymes-of-reaction" (rxn) {
        species: "species",
        experimental_only: "experimental-only?",
        local_only: "local-only-p"
    };
    /// Reactants and products of a reaction, in its direction within `pwy`.
    Any reaction_reactants_and_products = "reaction-reactants-and-products" (rxn) {
        direction: "direction",
        pwy: "pwy"
    };
    Scalar reaction_type = "reaction-type" (rxn);
    Boolean rxn_without_sequenced_enzyme_p = "rxn-without-sequenced-enzyme-p" (rxn; complete);
    Boolean pathway_hole_p = "pathway-hole-p" (rxn) {
        hole_if_any_gene_without_position: "hole-if-any-gene-without-position?"
    };
    Boolean rxn_present_p = "rxn-present-p" (rxn);
    Boolean rxn_specific_form_of_rxn_p = "rxn-specific-form-of-rxn-p" (specific_rxn, generic_rxn);
    Sequence nonspecific_forms_of_rxn = "nonspecific-forms-of-rxn" (rxn);
    Sequence specific_forms_of_rxn = "specific-forms-of-rxn" (rxn);
    Boolean rxn_in_compartment_p = "rxn-in-compartment-p" (rxn; compartments) {
        default_ok: "default-ok?",
        pwy: "pwy",
        loose: "loose"
    };
    Any compartment_of_rxn = "compartment-of-rxn" (rxn; default);
    Sequence compartments_of_reaction = "compartments-of-reaction" (rxn) {
        sides: "sides",
        default_compartment: "default-compartment"
    };
    Sequence transported_chemicals = "transported-chemicals" (rxn) {
        side: "side",
        primary_only: "primary-only?",
        from_compartment: "from-compartment",
        to_compartment: "to-compartment",
        show_compartment: "show-compartment"
    };
    Sequence get_predecessors = "get-predecessors" (rxn, pwy);
    Sequence get_successors = "get-successors" (rxn, pwy);
    Boolean rxn_w_isozymes_p = "rxn-w-isozymes-p" (rxn);

    // ------------- Pathways -------------
    Sequence genes_of_pathway = "genes-of-pathway" (pwy) { sorted: "sorted" };
    Sequence enzymes_of_pathway = "enzymes-of-pathway" (pwy) {
        species: "species",
        experimental_only: "experimental-only?",
        sorted: "sorted"
    };
    Sequence compounds_of_pathway = "compounds-of-pathway" (pwy);
    Any substrates_of_pathway = "substrates-of-pathway" (pwy);
    Sequence variants_of_pathway = "variants-of-pathway" (pwy);
    Any pathway_components = "pathway-components" (pwy) {
        rxn_list: "rxn-list",
        pred_list: "pred-list"
    };
    Boolean noncontiguous_pathway_p = "noncontiguous-pathway-p" (pwy);
    Boolean rxns_adjacent_in_pwy_p = "rxns-adjacent-in-pwy-p" (rxn1, rxn2, pwy);

    // ------------- Enzymatic reactions -------------
    Sequence cofactors_and_pgroups_of_enzrxn = "cofactors-and-pgroups-of-enzrxn" (enzrxn);
    Sequence enzrxn_activators = "enzrxn-activators" (er; phys_relevant_only);
    Sequence enzrxn_inhibitors = "enzrxn-inhibitors" (er; phys_relevant_only);
    Sequence pathways_of_enzrxn = "pathways-of-enzrxn" (enzrxn) {
        include_super_pwys: "include-super-pwys?"
    };
    Boolean pathway_allows_enzrxn = "pathway-allows-enzrxn" (pwy, rxn, enzrxn; single_species);

    // ------------- Proteins -------------
    Sequence monomers_of_protein = "monomers-of-protein" (protein) {
        coefficients: "coefficients?",
        unmodify: "unmodify?"
    };
    Any base_components_of_protein = "base-components-of-protein" (protein; exclude_small_molecules);
    Sequence containers_of = "containers-of" (protein; exclude_self);
    Sequence protein_or_rna_containers_of = "protein-or-rna-containers-of" (protein; exclude_self);
    Sequence homomultimeric_containers_of = "homomultimeric-containers-of" (protein; exclude_self);
    Boolean polypeptide_or_homomultimer_p = "polypeptide-or-homomultimer-p" (protein);
    FrameId unmodified_form = "unmodified-form" (protein);
    FrameId unmodified_or_unbound_form = "unmodified-or-unbound-form" (protein);
    Sequence reduce_modified_proteins = "reduce-modified-proteins" (; proteins) { debind: "debind?" };
    Sequence all_direct_forms_of_protein = "all-direct-forms-of-protein" (protein);
    Sequence all_forms_of_protein = "all-forms-of-protein" (protein);
    Sequence modified_forms = "modified-forms" (protein; exclude_self, all_variants);
    Sequence modified_and_unmodified_forms = "modified-and-unmodified-forms" (protein);
    Sequence modified_containers = "modified-containers" (protein);
    Sequence top_containers = "top-containers" (protein);
    Sequence small_molecule_cplxes_of_prot = "small-molecule-cplxes-of-prot" (protein);
    Sequence genes_of_protein = "genes-of-protein" (protein);
    Sequence genes_of_proteins = "genes-of-proteins" (; proteins);
    Sequence reactions_of_enzyme = "reactions-of-enzyme" (enzyme) {
        kb: "kb",
        include_specific_forms: "include-specific-forms?"
    };
    Any species_of_protein = "species-of-protein" (protein);
    Boolean leader_peptide_p = "leader-peptide-p" (protein);
    Boolean protein_p = "protein-p" (frame);
    Boolean complex_p = "complex-p" (frame);
    Boolean protein_in_compartment_p = "protein-in-compartment-p" (protein; compartments) {
        default_ok: "default-ok?",
        pwy: "pwy",
        loose: "loose?"
    };
    Sequence all_transporters_across = "all-transporters-across" () {
        membranes: "membranes",
        method: "method"
    };
    Sequence autocatalytic_reactions_of_enzyme = "autocatalytic-reactions-of-enzyme" (protein);

    // ------------- Genes -------------
    Boolean gene_p = "gene-p" (item);
    Sequence enzymes_of_gene = "enzymes-of-gene" (gene);
    Sequence all_products_of_gene = "all-products-of-gene" (gene);
    Sequence reactions_of_gene = "reactions-of-gene" (gene);
    Sequence pathways_of_gene = "pathways-of-gene" (gene) {
        include_super_pwys: "include-super-pwys"
    };
    FrameId chromosome_of_gene = "chromosome-of-gene" (gene);
    FrameId unmodified_gene_product = "unmodified-gene-product" (gene);
    Sequence unmodified_gene_products = "unmodified-gene-products" (gene);
    FrameId next_gene_on_replicon = "next-gene-on-replicon" (gene);
    FrameId previous_gene_on_replicon = "previous-gene-on-replicon" (gene);
    Boolean adjacent_genes_p = "adjacent-genes?" (g1, g2);
    Boolean neighboring_genes_p = "neighboring-genes-p" (g1, g2; n);
    Sequence gene_clusters = "gene-clusters" (; genes, max_gap);
    Boolean rna_coding_gene = "rna-coding-gene" (gene);
    Boolean protein_coding_gene = "protein-coding-gene" (gene);
    Boolean pseudo_gene_p = "pseudo-gene-p" (gene);
    Boolean phantom_gene_p = "phantom-gene-p" (gene);
    Boolean dna_binding_site_p = "dna-binding-site-p" (gene);
    Boolean terminator_p = "terminatorp" (gene);
    Sequence operon_of_gene = "operon-of-gene" (gene);
    Sequence genes_in_same_operon = "genes-in-same-operon" (gene);
    Sequence gene_transcription_units = "gene-transcription-units" (gene);
    Sequence cotranscribed_genes = "cotranscribed-genes" (gene);
    Sequence terminators_affecting_gene = "terminators-affecting-gene" (gene);
    FrameId chromosome_of_object = "chromosome-of-object" (item);

    // ------------- Regulation -------------
    Boolean activation_p = "activation-p" (reg_frame);
    Boolean inhibition_p = "inhibition-p" (reg_frame);
    Sequence direct_regulators = "direct-regulators" (item; filter);
    Sequence direct_activators = "direct-activators" (item);
    Sequence direct_inhibitors = "direct-inhibitors" (item);
    Boolean transcription_factor_p = "transcription-factor-p" (protein) {
        include_inactive: "include-inactive?"
    };
    Boolean regulator_of_type = "regulator-of-type" (protein, class_name);
    Sequence regulon_of_protein = "regulon-of-protein" (protein);
    Sequence regulation_frame_transcription_units = "regulation-frame-transcription-units" (reg_frame);
    Sequence transcription_unit_regulation_frames = "transcription-unit-regulation-frames" (tu);
    Sequence transcription_unit_activation_frames = "transcription-unit-activation-frames" (tu);
    Sequence transcription_unit_inhibition_frames = "transcription-unit-inhibition-frames" (tu);
    Sequence transcription_units_of_protein = "transcription-units-of-protein" (protein);
    Sequence genes_regulated_by_protein = "genes-regulated-by-protein" (protein);
    Sequence dna_binding_sites_of_protein = "DNA-binding-sites-of-protein" (tf) { all_forms: "all-forms?" };
    Sequence regulator_proteins_of_transcription_unit = "regulator-proteins-of-transcription-unit" (tu);
    /// `mode` is a keyword value such as `Value::keyword("activators")`.
    Sequence transcription_factor_ligands = "transcription-factor-ligands" (; tfs, mode);
    Sequence transcription_factor_active_forms = "transcription-factor-active-forms" (; tfs);
    Sequence genes_regulating_gene = "genes-regulating-gene" (gene);
    Sequence genes_regulated_by_gene = "genes-regulated-by-gene" (gene);
    Any regulators_of_gene_transcription = "regulators-of-gene-transcription" (gene; by_function);
    Sequence transcription_unit_activators = "transcription-unit-activators" (tu);
    Sequence transcription_unit_inhibitors = "transcription-unit-inhibitors" (tu);
    Sequence regulators_of_operon_transcription = "regulators-of-operon-transcription" (; operons, by_function);

    // ------------- Transcription units -------------
    FrameId transcription_unit_promoter = "transcription-unit-promoter" (tu);
    Sequence transcription_unit_genes = "transcription-unit-genes" (tu);
    FrameId transcription_unit_first_gene = "transcription-unit-first-gene" (tu);
    Sequence transcription_unit_binding_sites = "transcription-unit-binding-sites" (tu);
    Sequence transcription_unit_transcription_factors = "transcription-unit-transcription-factors" (tu);
    Sequence transcription_unit_mrna_binding_sites = "transcription-unit-mrna-binding-sites" (tu);
    FrameId chromosome_of_operon = "chromosome-of-operon" (tu);
    Sequence binding_sites_affecting_gene = "binding-sites-affecting-gene" (gene);
    Sequence binding_site_to_regulators = "binding-site->regulators" (bsite);
    Sequence transcription_units_of_promoter = "transcription-units-of-promoter" (promoter);
    Sequence promoter_binding_sites = "promoter-binding-sites" (promoter);
    Sequence transcription_unit_terminators = "transcription-unit-terminators" (tu);
    Sequence containing_tus = "containing-tus" (site);
    FrameId containing_chromosome = "containing-chromosome" (site);
    Sequence binding_site_promoters = "binding-site-promoters" (tu);
    Sequence transcription_unit_all_components = "transcription-unit-all-components" (tu);
    Sequence binding_site_transcription_units = "binding-site-transcription-units" (promoter);

    // ------------- Compounds -------------
    Boolean substrate_of_generic_rxn = "substrate-of-generic-rxn" (cpd, rxn);
    Sequence pathways_of_compound = "pathways-of-compound" (cpd) {
        non_specific_too: "non-specific-too?",
        modulators: "modulators?",
        phys_relevant: "phys-relevant?",
        include_rxns: "include-rxns?"
    };
    Sequence deactivated_or_inhibited_by_compound = "deactivated-or-inhibited-by-compound" (; cpds) {
        mode: "mode",
        mechanisms: "mechanisms",
        phys_relevant: "phys-relevant?",
        slots: "slots"
    };
    Sequence tfs_bound_to_compound = "tfs-bound-to-compound" (cpd) {
        include_inactive: "include-inactive?"
    };

    // ------------- Names -------------
    Scalar full_enzyme_name = "full-enzyme-name" (enzyme; use_frame_name, name, activity_names);
    Scalar enzyme_activity_name = "enzyme-activity-name" (enzyme, reaction);
}

// ------------- Operations with defaulted selectors -------------
/// Options of [`Database::get_name_string`]; unset options are left to the engine.
#[derive(Debug, Clone, Default)]
pub struct NameOptions {
    pub rxn_eqn_as_name: Option<bool>,
    pub rxn_common_name_as_name: Option<bool>,
    pub direction: Option<Value>,
    pub name_slot: Option<Value>,
    pub strip_html: Option<bool>,
    pub include_species_strain_name: Option<bool>,
    pub italicize_species: Option<bool>,
    pub short_name: Option<bool>,
    pub species_initials: Option<bool>,
    pub primary_class: Option<Value>,
}

/// Filters of [`Database::reactions_of_compound`].
#[derive(Debug, Clone, Default)]
pub struct CompoundReactions {
    pub non_specific_too: Option<bool>,
    pub transport_only: Option<bool>,
    pub compartment: Option<Value>,
    pub enzymatic: Option<bool>,
}

impl Database {
    /// All pathways, `selector` being `all` or `small-molecule`. With `base`
    /// only base pathways are listed, no superpathways.
    pub fn all_pathways(&self, selector: &str, base: bool) -> Result<Value> {
        self.invoke(
            &Call::new("all-pathways").arg(Value::keyword(selector)).arg(base),
            Shape::Sequence,
        )
    }
    /// All reactions of a type, e.g. `metab-smm`, `enzyme` or `transport`.
    pub fn all_rxns(&self, kind: &str) -> Result<Value> {
        self.invoke(&Call::new("all-rxns").arg(Value::keyword(kind)), Shape::Sequence)
    }
    pub fn all_reactions(&self, kind: &str) -> Result<Value> {
        self.all_rxns(kind)
    }
    /// Protein complexes, `filter` being `all`, `hetero` or `homo`.
    pub fn all_protein_complexes(&self, filter: &str) -> Result<Value> {
        self.invoke(
            &Call::new("all-protein-complexes").keyword("filter", Value::keyword(filter)),
            Shape::Sequence,
        )
    }
    /// With `kind` of `None` any enzymatic activity counts.
    pub fn enzyme_p(&self, protein: impl AsFrameId, kind: Option<&str>) -> Result<Value> {
        self.invoke(
            &Call::new("enzyme-p")
                .arg(protein.frame_id())
                .arg(kind.map(Value::keyword)),
            Shape::Boolean,
        )
    }
    pub fn reactions_of_protein(
        &self,
        protein: impl AsFrameId,
        check_protein_components: Option<bool>,
        check_protein_containers: Option<bool>,
    ) -> Result<Value> {
        self.invoke(
            &Call::new("reactions-of-protein")
                .arg(protein.frame_id())
                .arg(check_protein_components)
                .arg(check_protein_containers),
            Shape::Sequence,
        )
    }
    pub fn reactions_of_compound(&self, cpd: impl AsFrameId, filters: CompoundReactions) -> Result<Value> {
        let call = Call::new("reactions-of-compound")
            .arg(cpd.frame_id())
            .keyword_opt("non-specific-too?", filters.non_specific_too)
            .keyword_opt("transport-only?", filters.transport_only)
            .keyword_opt("compartment", filters.compartment)
            .keyword_opt("enzymatic?", filters.enzymatic);
        self.invoke(&call, Shape::Sequence)
    }
    /// The display name of a frame.
    pub fn get_name_string(&self, item: impl AsFrameId, options: NameOptions) -> Result<Value> {
        let call = Call::new("get-name-string")
            .arg(item.frame_id())
            .keyword_opt("rxn-eqn-as-name", options.rxn_eqn_as_name)
            .keyword_opt("rxn-common-name-as-name", options.rxn_common_name_as_name)
            .keyword_opt("direction", options.direction)
            .keyword_opt("name-slot", options.name_slot)
            .keyword_opt("strip-html?", options.strip_html)
            .keyword_opt("include-species-strain-name?", options.include_species_strain_name)
            .keyword_opt("italicize-species?", options.italicize_species)
            .keyword_opt("short-name?", options.short_name)
            .keyword_opt("species-initials", options.species_initials)
            .keyword_opt("primary-class", options.primary_class);
        self.invoke(&call, Shape::Scalar)
    }
}

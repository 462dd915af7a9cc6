pub mod configuration;

pub mod kernelexperienceerror;

pub mod kernel {
    pub mod kernelevaluator;
    pub mod analytickernel;
}

pub mod math {
    pub mod timegrid;
}

pub mod solver {
    pub mod quadraturemethod;
    pub mod lagtable;
    pub mod coefficientmatrix;
    pub mod trajectory;
    pub mod volterrasolver;
}

pub mod experience {
    pub mod experiencecurve;
    pub mod experienceprojector;
    pub mod kernelprojection;
}

pub mod stabilizer {
    pub mod curvestabilizer;
    pub mod hilbertenvelope;
}
